//! Price Attestation Verifier
//!
//! Attests that a Pyth price quote was signed by the single trusted provider
//! and was current enough, recording a `pythCheck` receipt on success.
//!
//! ## Verification Order
//!
//! 1. Read the trusted key and assert it equals the caller's snapshot
//! 2. Verify the provider signature over `[id, mean_price, confidence, publish_time]`
//! 3. Require `publish_time >= current_time`
//! 4. Compute the freshness window predicate (enforced only under `STRICT`)
//! 5. Compute the price sanity predicates (enforced only under `STRICT`)
//! 6. Append `VerificationEvent { id }`
//!
//! Verification is all-or-nothing: the receipt log is only touched in step 6.
//!
//! ## State Pattern (UTXO Model)
//!
//! The verifier charm holds the registry and the receipt log. A verify
//! spell spends it and recreates it with one more receipt; the key never
//! changes after initialization.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// Charms SDK integration (conditional compilation)
#[cfg(feature = "charms")]
pub mod charms;


use zkpyth_common::{
    check,
    constants::verifier::FRESHNESS_WINDOW,
    errors::{ZkPythError, ZkPythResult},
    events::{EventLog, VerificationEvent},
    registry::KeyRegistry,
    signing::verify_attestation_signature,
    types::{AttestationSignature, FeedId, PriceAttestation, Timestamp, TrustedKey, VerifierAction},
    validation::{
        confidence_is_non_negative, price_is_positive, require_publish_not_before,
        verify_field_eq, within_freshness_window,
    },
};

// ============ Policy ============

/// Which computed predicates reject a verification.
///
/// `LITERAL` computes the freshness window and price sanity predicates but
/// never rejects on them. `STRICT` rejects on them; switching to it is a
/// behavior change for callers that relied on those inputs passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationPolicy {
    /// Freshness window in time units
    pub freshness_window: u64,
    /// Reject attestations outside the freshness window
    pub enforce_freshness_window: bool,
    /// Reject non-positive prices and negative confidence
    pub enforce_price_sanity: bool,
}

impl VerificationPolicy {
    /// Computed but unenforced predicates
    pub const LITERAL: Self = Self {
        freshness_window: FRESHNESS_WINDOW,
        enforce_freshness_window: false,
        enforce_price_sanity: false,
    };

    /// Every predicate enforced
    pub const STRICT: Self = Self {
        freshness_window: FRESHNESS_WINDOW,
        enforce_freshness_window: true,
        enforce_price_sanity: true,
    };
}

impl Default for VerificationPolicy {
    #[cfg(not(feature = "strict-checks"))]
    fn default() -> Self {
        Self::LITERAL
    }

    #[cfg(feature = "strict-checks")]
    fn default() -> Self {
        Self::STRICT
    }
}

/// Result of a successful verification, with the advisory predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// Receipt that was appended
    pub event: VerificationEvent,
    /// `publish_time + window >= current_time`
    pub within_freshness_window: bool,
    /// `mean_price > 0`
    pub price_positive: bool,
    /// `confidence_interval >= 0`
    pub confidence_non_negative: bool,
}

// ============ Verifier State ============

/// Verifier contract state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VerifierState {
    /// Trusted provider key
    pub registry: KeyRegistry,
    /// Receipts of verified attestations
    pub receipts: EventLog,
}

impl VerifierState {
    /// Create initialized state with an empty receipt log
    pub fn new(key: TrustedKey) -> ZkPythResult<Self> {
        Ok(Self {
            registry: KeyRegistry::with_key(key)?,
            receipts: EventLog::new(),
        })
    }

    /// Commit the trusted key (once)
    pub fn initialize(&mut self, key: TrustedKey) -> ZkPythResult<()> {
        self.registry.initialize(key)
    }

    /// Verify an attestation and record its receipt
    pub fn verify(
        &mut self,
        expected_key: &TrustedKey,
        signature: &AttestationSignature,
        attestation: &PriceAttestation,
        current_time: Timestamp,
        policy: &VerificationPolicy,
    ) -> ZkPythResult<VerificationOutcome> {
        verify(
            &self.registry,
            expected_key,
            signature,
            attestation,
            current_time,
            policy,
            &mut self.receipts,
        )
    }

    /// Whether an attestation id was ever verified
    pub fn query(&self, id: &FeedId) -> bool {
        self.receipts.query(id)
    }
}

// ============ Verification ============

/// Verify a signed attestation against the registry.
///
/// Appends exactly one receipt to `events` on success and nothing on failure.
///
/// # Errors
/// - `NotInitialized` if no key is committed
/// - `StaleState` if the committed key is not `expected_key`
/// - `InvalidSignature` if the signature does not cover the four fields
/// - `Timing` if `publish_time < current_time`
/// - `PriceOutsideFreshnessWindow` / `InvalidPriceData` under an enforcing policy
pub fn verify(
    registry: &KeyRegistry,
    expected_key: &TrustedKey,
    signature: &AttestationSignature,
    attestation: &PriceAttestation,
    current_time: Timestamp,
    policy: &VerificationPolicy,
    events: &mut EventLog,
) -> ZkPythResult<VerificationOutcome> {
    let outcome = checked_attestation(registry, expected_key, signature, attestation, current_time, policy)?;
    record(&outcome, attestation, current_time, events);
    Ok(outcome)
}

/// Steps 1-5 with rejections logged
fn checked_attestation(
    registry: &KeyRegistry,
    expected_key: &TrustedKey,
    signature: &AttestationSignature,
    attestation: &PriceAttestation,
    current_time: Timestamp,
    policy: &VerificationPolicy,
) -> ZkPythResult<VerificationOutcome> {
    check_attestation(registry, expected_key, signature, attestation, current_time, policy)
        .map_err(|err| reject(err, attestation, current_time))
}

/// Step 6: the only mutation
fn record(
    outcome: &VerificationOutcome,
    attestation: &PriceAttestation,
    current_time: Timestamp,
    events: &mut EventLog,
) {
    events.append(outcome.event);
    info!(
        channel = outcome.event.channel(),
        id = %hex::encode(attestation.id),
        publish_time = attestation.publish_time,
        current_time,
        "attestation verified"
    );
}

fn reject(err: ZkPythError, attestation: &PriceAttestation, current_time: Timestamp) -> ZkPythError {
    debug!(
        code = err.code(),
        id = %hex::encode(attestation.id),
        publish_time = attestation.publish_time,
        current_time,
        "attestation rejected"
    );
    err
}

/// Steps 1-5: pure checks, no mutation
fn check_attestation(
    registry: &KeyRegistry,
    expected_key: &TrustedKey,
    signature: &AttestationSignature,
    attestation: &PriceAttestation,
    current_time: Timestamp,
    policy: &VerificationPolicy,
) -> ZkPythResult<VerificationOutcome> {
    // 1. Staleness guard on the registry read
    let key = registry.get_and_assert_equals(expected_key)?;

    // 2. Signature over the exact four-field tuple
    verify_attestation_signature(&key, attestation, signature)?;

    // 3. Timing
    require_publish_not_before(attestation.publish_time, current_time)?;

    // 4. Freshness window
    let within_window =
        within_freshness_window(attestation.publish_time, current_time, policy.freshness_window);
    if policy.enforce_freshness_window {
        check!(
            within_window,
            ZkPythError::PriceOutsideFreshnessWindow {
                publish_time: attestation.publish_time,
                current_time,
                window: policy.freshness_window,
            }
        );
    }

    // 5. Price sanity
    let price_positive = price_is_positive(attestation);
    let confidence_non_negative = confidence_is_non_negative(attestation);
    if policy.enforce_price_sanity {
        check!(
            price_positive && confidence_non_negative,
            ZkPythError::InvalidPriceData {
                mean_price: attestation.mean_price,
                confidence_interval: attestation.confidence_interval,
            }
        );
    }

    Ok(VerificationOutcome {
        event: VerificationEvent::new(attestation.id),
        within_freshness_window: within_window,
        price_positive,
        confidence_non_negative,
    })
}

// ============ Validation Context ============

/// Context for validating a verifier state transition
pub struct VerifierContext {
    /// Current verifier state
    pub state: VerifierState,
    /// Proposed verifier state
    pub new_state: VerifierState,
    /// Policy in force for this deployment
    pub policy: VerificationPolicy,
    /// Event log
    pub events: EventLog,
}

/// Main validation entry point
pub fn validate(ctx: &mut VerifierContext, action: &VerifierAction) -> ZkPythResult<()> {
    match action {
        VerifierAction::Initialize { key } => validate_initialize(Some(&ctx.state), &ctx.new_state, key),
        VerifierAction::Verify {
            expected_key,
            signature,
            attestation,
            current_time,
        } => validate_verify(ctx, expected_key, signature, attestation, *current_time),
    }
}

/// Validate a whole spell: every verifier state it spends and creates.
///
/// Initialize spends none and creates one; Verify spends one and creates
/// one. Any other shape could mint a second verifier state with a foreign
/// key or forged receipts. Returns the receipts emitted by the spell.
pub fn validate_spell(
    inputs: &[VerifierState],
    outputs: &[VerifierState],
    action: &VerifierAction,
    policy: VerificationPolicy,
) -> ZkPythResult<EventLog> {
    let count_mismatch = ZkPythError::StateCountMismatch {
        inputs: inputs.len(),
        outputs: outputs.len(),
    };

    match action {
        VerifierAction::Initialize { key } => {
            // A committed key is never overwritten
            check!(
                !inputs.iter().any(|s| s.registry.is_initialized()),
                ZkPythError::AlreadyInitialized
            );
            check!(inputs.is_empty() && outputs.len() == 1, count_mismatch);

            validate_initialize(None, &outputs[0], key)?;
            Ok(EventLog::new())
        }
        VerifierAction::Verify { .. } => {
            check!(inputs.len() == 1 && outputs.len() == 1, count_mismatch);

            let mut ctx = VerifierContext {
                state: inputs[0].clone(),
                new_state: outputs[0].clone(),
                policy,
                events: EventLog::new(),
            };
            validate(&mut ctx, action)?;
            Ok(ctx.events)
        }
    }
}

/// Validate creation of the verifier state.
///
/// `input` is the existing verifier state if the spell spends one. A state
/// that already holds a key cannot be initialized again.
pub fn validate_initialize(
    input: Option<&VerifierState>,
    output: &VerifierState,
    key: &TrustedKey,
) -> ZkPythResult<()> {
    // 1. Never overwrite a committed key
    if let Some(state) = input {
        check!(!state.registry.is_initialized(), ZkPythError::AlreadyInitialized);
    }

    // 2. Output must be exactly a fresh registry with the key
    let expected = VerifierState::new(*key)?;
    verify_field_eq(&output.registry, &expected.registry)?;
    check!(output.receipts.is_empty(), ZkPythError::InvalidStateTransition);

    Ok(())
}

/// Validate a verify spell. `ctx.events` only changes if every check passes.
fn validate_verify(
    ctx: &mut VerifierContext,
    expected_key: &TrustedKey,
    signature: &AttestationSignature,
    attestation: &PriceAttestation,
    current_time: Timestamp,
) -> ZkPythResult<()> {
    // 1. Check the attestation against the input state
    let outcome = checked_attestation(
        &ctx.state.registry,
        expected_key,
        signature,
        attestation,
        current_time,
        &ctx.policy,
    )?;

    // 2. Key is immutable
    verify_field_eq(&ctx.new_state.registry, &ctx.state.registry)
        .map_err(|err| reject(err, attestation, current_time))?;

    // 3. Receipt log grows by exactly this receipt
    if !ctx.new_state.receipts.extends(&ctx.state.receipts, &[outcome.event]) {
        return Err(reject(ZkPythError::InvalidStateTransition, attestation, current_time));
    }

    // 4. Commit
    record(&outcome, attestation, current_time, &mut ctx.events);
    Ok(())
}

// ============ Tests ============
