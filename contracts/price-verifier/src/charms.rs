//! Charms SDK Integration for zkPyth Price Verifier
//!
//! Bridges the Charms SDK types with the internal verifier logic.
//!
//! ```text
//! Initialize (once):
//!   IN:  [no verifier charm]
//!   OUT: [Verifier charm (trusted key, no receipts)]
//!
//! Verify:
//!   IN:  [Verifier charm]
//!   OUT: [Verifier charm (same key, receipts + VerificationEvent { id })]
//!
//! Other apps checking a receipt:
//!   REFS: [Verifier charm]  <- Not consumed, just referenced
//! ```
//!
//! The witness carries the key snapshot the host fetched when it built the
//! spell. If the verifier charm being spent holds a different key, the spell
//! fails with `StaleState` and the host must re-fetch and rebuild.

use charms_data::{App, Data, Transaction};
use crate::{validate_spell, VerificationPolicy, VerifierState};
use zkpyth_common::{
    events::EventLog,
    types::{AttestationSignature, FeedId, PriceAttestation, Timestamp, TrustedKey, VerifierAction},
};

// ============ Operation Codes ============

/// Operation codes for verifier actions (encoded in witness)
pub mod op {
    /// Commit the trusted key (first-time creation)
    pub const INITIALIZE: u8 = 0x00;
    /// Verify a signed price attestation
    pub const VERIFY: u8 = 0x40;
}

// ============ Witness Structures ============

/// Witness data for verifier operations
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VerifierWitness {
    /// Operation type (see `op` module)
    pub op: u8,
    /// Trusted key (Initialize) or expected key snapshot (Verify)
    pub key: Option<TrustedKey>,
    /// Provider signature (Verify)
    pub signature: Option<AttestationSignature>,
    /// Price attestation (Verify)
    pub attestation: Option<PriceAttestation>,
    /// Claimed current time (Verify)
    pub current_time: Option<Timestamp>,
}

impl VerifierWitness {
    /// Create witness for verifier initialization
    pub fn initialize(key: TrustedKey) -> Self {
        Self {
            op: op::INITIALIZE,
            key: Some(key),
            signature: None,
            attestation: None,
            current_time: None,
        }
    }

    /// Create witness for attestation verification
    pub fn verify(
        expected_key: TrustedKey,
        signature: AttestationSignature,
        attestation: PriceAttestation,
        current_time: Timestamp,
    ) -> Self {
        Self {
            op: op::VERIFY,
            key: Some(expected_key),
            signature: Some(signature),
            attestation: Some(attestation),
            current_time: Some(current_time),
        }
    }
}

// ============ Main Validation Function ============

/// Validates a verifier operation within a Charms transaction.
///
/// Every verifier charm the transaction spends or creates is collected and
/// checked, so a spell cannot slip in a second verifier state.
///
/// # Arguments
/// * `app` - The price verifier app definition
/// * `tx` - The transaction being validated
/// * `_x` - Public inputs (unused)
/// * `w` - Witness data (operation details)
///
/// # Returns
/// `true` if the operation is valid, `false` otherwise
pub fn validate_verifier_operation(
    app: &App,
    tx: &Transaction,
    _x: &Data,
    w: &Data,
) -> bool {
    // 1. Parse witness to get operation
    let witness = match parse_witness(w) {
        Some(w) => w,
        None => return false,
    };

    // 2. Convert to internal action type
    let action = match witness_to_action(&witness) {
        Some(a) => a,
        None => return false,
    };

    // 3. Collect every verifier state spent and created
    let (inputs, outputs) = match extract_verifier_states(app, tx) {
        Some(s) => s,
        None => return false,
    };

    // 4. Run validation over the whole spell
    validate_spell(&inputs, &outputs, &action, VerificationPolicy::default()).is_ok()
}

// ============ Parsing Functions ============

/// Parse witness data into VerifierWitness
fn parse_witness(w: &Data) -> Option<VerifierWitness> {
    w.value::<VerifierWitness>().ok()
}

/// Convert witness to internal action type
fn witness_to_action(w: &VerifierWitness) -> Option<VerifierAction> {
    match w.op {
        op::INITIALIZE => Some(VerifierAction::Initialize { key: w.key? }),
        op::VERIFY => Some(VerifierAction::Verify {
            expected_key: w.key?,
            signature: w.signature?,
            attestation: w.attestation?,
            current_time: w.current_time?,
        }),
        _ => None,
    }
}

// ============ State Extraction ============

/// Decode every verifier charm found.
///
/// `None` if any of them is not a valid `VerifierState`.
fn decode_states<'a>(found: impl Iterator<Item = Option<&'a Data>>) -> Option<Vec<VerifierState>> {
    found
        .flatten()
        .map(|data| data.value::<VerifierState>().ok())
        .collect()
}

/// Extract all verifier states from transaction inputs and outputs
fn extract_verifier_states(
    app: &App,
    tx: &Transaction,
) -> Option<(Vec<VerifierState>, Vec<VerifierState>)> {
    let inputs = decode_states(tx.ins.iter().map(|(_, charms)| charms.get(app)))?;
    let outputs = decode_states(tx.outs.iter().map(|charms| charms.get(app)))?;
    Some((inputs, outputs))
}

// ============ Receipt Reading (for other apps) ============

/// Read the verifier state from reference inputs.
///
/// `None` unless exactly one verifier charm is referenced.
pub fn read_verifier_state_from_refs(tx: &Transaction, verifier_app: &App) -> Option<VerifierState> {
    single_state(decode_states(tx.refs.iter().map(|(_, charms)| charms.get(verifier_app)))?)
}

/// The only state, if there is exactly one
fn single_state(mut states: Vec<VerifierState>) -> Option<VerifierState> {
    if states.len() != 1 {
        return None;
    }
    states.pop()
}

/// Read the receipt log from reference inputs
pub fn read_receipts_from_refs(tx: &Transaction, verifier_app: &App) -> Option<EventLog> {
    read_verifier_state_from_refs(tx, verifier_app).map(|state| state.receipts)
}

/// Whether a referenced verifier charm holds a receipt for `id`
pub fn is_verified_in_refs(tx: &Transaction, verifier_app: &App, id: &FeedId) -> bool {
    read_verifier_state_from_refs(tx, verifier_app)
        .map(|state| state.query(id))
        .unwrap_or(false)
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_witness() -> VerifierWitness {
        VerifierWitness::verify(
            TrustedKey::from_bytes([1u8; 32]),
            AttestationSignature { r: [2u8; 32], s: [3u8; 32] },
            PriceAttestation::new([4u8; 32], 100, 1, 1_000),
            1_000,
        )
    }

    #[test]
    fn test_witness_serialization() {
        let witness = create_test_witness();
        let data = Data::from(&witness);
        let parsed = parse_witness(&data).unwrap();

        assert_eq!(parsed.op, op::VERIFY);
        assert_eq!(parsed.current_time, Some(1_000));
    }

    #[test]
    fn test_witness_to_action() {
        let witness = create_test_witness();
        let action = witness_to_action(&witness).unwrap();

        match action {
            VerifierAction::Verify { attestation, current_time, .. } => {
                assert_eq!(attestation.id, [4u8; 32]);
                assert_eq!(current_time, 1_000);
            }
            _ => panic!("Expected Verify action"),
        }
    }

    #[test]
    fn test_incomplete_verify_witness_rejected() {
        let mut witness = create_test_witness();
        witness.signature = None;

        assert!(witness_to_action(&witness).is_none());
    }

    #[test]
    fn test_unknown_op_rejected() {
        let mut witness = VerifierWitness::initialize(TrustedKey::from_bytes([1u8; 32]));
        witness.op = 0x31;

        assert!(witness_to_action(&witness).is_none());
    }

    #[test]
    fn test_decode_states_skips_other_apps() {
        let state = VerifierState::default();
        let data = Data::from(&state);
        let found = vec![Some(&data), None, Some(&data)];

        let states = decode_states(found.into_iter()).unwrap();
        assert_eq!(states.len(), 2);
    }

    #[test]
    fn test_decode_states_rejects_malformed_charm() {
        let good = Data::from(&VerifierState::default());
        let bad = Data::from(&create_test_witness());
        let found = vec![Some(&good), Some(&bad)];

        assert!(decode_states(found.into_iter()).is_none());
    }

    #[test]
    fn test_single_state_requires_exactly_one() {
        assert!(single_state(vec![]).is_none());
        assert!(single_state(vec![VerifierState::default()]).is_some());
        assert!(single_state(vec![VerifierState::default(), VerifierState::default()]).is_none());
    }
}
