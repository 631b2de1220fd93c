//! Validation Helpers for zkPyth
//!
//! The `check!` macro plus the timing and price predicates used by the
//! verifier. The predicates only compute; whether a failed predicate
//! rejects the call is the verifier's policy decision.
//!
//! ```rust,ignore
//! use zkpyth_common::validation::check;
//!
//! check!(registry.is_initialized(), ZkPythError::NotInitialized);
//! ```

use crate::errors::{ZkPythError, ZkPythResult};
use crate::types::{PriceAttestation, Timestamp};

// ============ Validation Macro ============

/// Check a condition and return an error if it fails.
#[macro_export]
macro_rules! check {
    ($condition:expr, $error:expr) => {
        if !($condition) {
            return Err($error);
        }
    };
}

pub use check;

// ============ Timing ============

/// Require `publish_time >= current_time`.
///
/// This is the enforced timing rule. Note that it requires the attestation
/// to be dated at or after the claimed current time, which is the inverse
/// of a conventional staleness bound.
pub fn require_publish_not_before(publish_time: Timestamp, current_time: Timestamp) -> ZkPythResult<()> {
    check!(
        publish_time >= current_time,
        ZkPythError::Timing {
            publish_time,
            current_time,
        }
    );
    Ok(())
}

/// `publish_time + window >= current_time`, saturating
pub fn within_freshness_window(publish_time: Timestamp, current_time: Timestamp, window: u64) -> bool {
    publish_time.saturating_add(window) >= current_time
}

// ============ Price Sanity ============

/// `mean_price > 0`
pub fn price_is_positive(attestation: &PriceAttestation) -> bool {
    attestation.mean_price > 0
}

/// `confidence_interval >= 0`
pub fn confidence_is_non_negative(attestation: &PriceAttestation) -> bool {
    attestation.confidence_interval >= 0
}

// ============ State Transition Helpers ============

/// Verify a field value matches expected.
pub fn verify_field_eq<T: PartialEq>(actual: T, expected: T) -> ZkPythResult<()> {
    check!(actual == expected, ZkPythError::InvalidStateTransition);
    Ok(())
}

// ============ Tests ============
