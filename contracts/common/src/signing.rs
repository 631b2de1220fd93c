//! Attestation Signing
//!
//! The trusted provider signs `SHA-256(SIGNING_DOMAIN || id || mean_price ||
//! confidence_interval || publish_time)`, integers little-endian. This is
//! the borsh layout of `PriceAttestation`, so any borsh encoder on the
//! provider side produces the same message.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::constants::verifier::SIGNING_DOMAIN;
use crate::errors::{ZkPythError, ZkPythResult};
use crate::types::{AttestationSignature, PriceAttestation, TrustedKey};

/// Digest the provider signs for an attestation
pub fn attestation_message(attestation: &PriceAttestation) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SIGNING_DOMAIN);
    hasher.update(attestation.id);
    hasher.update(attestation.mean_price.to_le_bytes());
    hasher.update(attestation.confidence_interval.to_le_bytes());
    hasher.update(attestation.publish_time.to_le_bytes());
    hasher.finalize().into()
}

/// Decode the trusted key into an ed25519 verifying key
pub fn decode_trusted_key(key: &TrustedKey) -> ZkPythResult<VerifyingKey> {
    VerifyingKey::from_bytes(key.as_bytes()).map_err(|_| ZkPythError::InvalidPublicKey)
}

/// Verify a provider signature over the four attestation fields
pub fn verify_attestation_signature(
    key: &TrustedKey,
    attestation: &PriceAttestation,
    signature: &AttestationSignature,
) -> ZkPythResult<()> {
    let verifying_key = decode_trusted_key(key)?;
    let signature = Signature::from_bytes(&signature.to_bytes());
    let message = attestation_message(attestation);

    verifying_key
        .verify_strict(&message, &signature)
        .map_err(|_| ZkPythError::InvalidSignature)
}

/// Sign an attestation as the provider would publish it
pub fn sign_attestation(signing_key: &SigningKey, attestation: &PriceAttestation) -> AttestationSignature {
    let message = attestation_message(attestation);
    let signature: Signature = signing_key.sign(&message);
    AttestationSignature::from_bytes(&signature.to_bytes())
}

/// Trusted key matching a provider signing key
pub fn trusted_key_of(signing_key: &SigningKey) -> TrustedKey {
    TrustedKey::from_bytes(signing_key.verifying_key().to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    fn attestation() -> PriceAttestation {
        PriceAttestation::new([1u8; 32], 6_500_000_000_000, 1_250_000_000, 1_000)
    }

    #[test]
    fn test_message_matches_borsh_layout() {
        let att = attestation();

        let mut hasher = Sha256::new();
        hasher.update(SIGNING_DOMAIN);
        hasher.update(borsh::to_vec(&att).unwrap());
        let expected: [u8; 32] = hasher.finalize().into();

        assert_eq!(attestation_message(&att), expected);
    }

    #[test]
    fn test_sign_and_verify() {
        let key = provider();
        let att = attestation();
        let sig = sign_attestation(&key, &att);

        assert!(verify_attestation_signature(&trusted_key_of(&key), &att, &sig).is_ok());
    }

    #[test]
    fn test_every_field_is_covered() {
        let key = provider();
        let trusted = trusted_key_of(&key);
        let att = attestation();
        let sig = sign_attestation(&key, &att);

        let tampered = [
            PriceAttestation { id: [2u8; 32], ..att },
            PriceAttestation { mean_price: att.mean_price + 1, ..att },
            PriceAttestation { confidence_interval: att.confidence_interval + 1, ..att },
            PriceAttestation { publish_time: att.publish_time + 1, ..att },
        ];

        for t in tampered.iter() {
            assert_eq!(
                verify_attestation_signature(&trusted, t, &sig),
                Err(ZkPythError::InvalidSignature)
            );
        }
    }

    #[test]
    fn test_wrong_signer_rejected() {
        let att = attestation();
        let sig = sign_attestation(&SigningKey::from_bytes(&[8u8; 32]), &att);

        assert_eq!(
            verify_attestation_signature(&trusted_key_of(&provider()), &att, &sig),
            Err(ZkPythError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_signature_rejected() {
        let att = attestation();
        let sig = AttestationSignature { r: [0xFF; 32], s: [0xFF; 32] };

        assert_eq!(
            verify_attestation_signature(&trusted_key_of(&provider()), &att, &sig),
            Err(ZkPythError::InvalidSignature)
        );
    }
}
