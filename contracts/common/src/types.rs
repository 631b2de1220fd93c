//! Core Types for zkPyth Verifier

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::keys::{PUBLIC_KEY_LEN, SIGNATURE_LEN};

/// Type alias for price feed (attestation) identifiers
pub type FeedId = [u8; 32];

/// Type alias for timestamps (provider time units)
pub type Timestamp = u64;

// ============ Key Types ============

/// Public key of the trusted price provider (ed25519)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TrustedKey(pub [u8; PUBLIC_KEY_LEN]);

impl TrustedKey {
    /// Wrap raw public key bytes
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw public key bytes
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

impl From<[u8; PUBLIC_KEY_LEN]> for TrustedKey {
    fn from(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }
}

/// Provider signature over a price attestation (ed25519, `R || s`)
///
/// Stored as two halves so it stays serde-friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AttestationSignature {
    /// Encoded curve point `R`
    pub r: [u8; 32],
    /// Scalar `s`
    pub s: [u8; 32],
}

impl AttestationSignature {
    /// Split a 64-byte signature into its halves
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LEN]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self { r, s }
    }

    /// Parse from an arbitrary slice, rejecting the wrong length
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: &[u8; SIGNATURE_LEN] = bytes.try_into().ok()?;
        Some(Self::from_bytes(bytes))
    }

    /// Join the halves back into 64 bytes
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }
}

// ============ Attestation Types ============

/// A price quote as published by the off-chain provider.
///
/// Field order is the signed tuple order: `[id, mean_price,
/// confidence_interval, publish_time]`. Do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PriceAttestation {
    /// Price feed identifier
    pub id: FeedId,
    /// Mean (aggregate) price
    pub mean_price: i64,
    /// Confidence interval around the mean
    pub confidence_interval: i64,
    /// Provider publish time
    pub publish_time: Timestamp,
}

impl PriceAttestation {
    /// Creates a new attestation
    pub fn new(id: FeedId, mean_price: i64, confidence_interval: i64, publish_time: Timestamp) -> Self {
        Self {
            id,
            mean_price,
            confidence_interval,
            publish_time,
        }
    }
}

// ============ Actions ============

/// Verifier actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum VerifierAction {
    /// Commit the trusted provider key (once)
    Initialize { key: TrustedKey },
    /// Check a signed attestation and record a receipt
    Verify {
        /// Key snapshot the caller built the call against
        expected_key: TrustedKey,
        signature: AttestationSignature,
        attestation: PriceAttestation,
        current_time: Timestamp,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_halves() {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[0] = 1;
        bytes[63] = 2;

        let sig = AttestationSignature::from_bytes(&bytes);
        assert_eq!(sig.r[0], 1);
        assert_eq!(sig.s[31], 2);
        assert_eq!(sig.to_bytes(), bytes);
    }

    #[test]
    fn test_signature_from_slice_rejects_wrong_length() {
        assert!(AttestationSignature::from_slice(&[0u8; 63]).is_none());
        assert!(AttestationSignature::from_slice(&[0u8; 65]).is_none());
        assert!(AttestationSignature::from_slice(&[0u8; 64]).is_some());
    }

    #[test]
    fn test_attestation_borsh_field_order() {
        let att = PriceAttestation::new([9u8; 32], -5, 7, 1_000);
        let bytes = borsh::to_vec(&att).unwrap();

        assert_eq!(bytes.len(), 32 + 8 + 8 + 8);
        assert_eq!(&bytes[..32], &[9u8; 32]);
        assert_eq!(&bytes[32..40], &(-5i64).to_le_bytes());
        assert_eq!(&bytes[40..48], &7i64.to_le_bytes());
        assert_eq!(&bytes[48..56], &1_000u64.to_le_bytes());
    }
}
