//! Error Types for zkPyth Verifier
//!
//! Typed errors for every way a verification can be rejected. Every
//! failure is fatal to the call: no receipt is recorded on any error path.

use core::fmt;

/// Result type alias for zkPyth operations
pub type ZkPythResult<T> = Result<T, ZkPythError>;

/// Main error enum for all zkPyth verifier errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZkPythError {
    // ============ Registry Errors ============
    /// Registry read does not match the snapshot the caller built against
    StaleState { expected: [u8; 32], actual: [u8; 32] },

    /// No trusted key has been committed yet
    NotInitialized,

    /// A trusted key is already committed
    AlreadyInitialized,

    /// Key bytes are not a valid ed25519 public key
    InvalidPublicKey,

    // ============ Attestation Errors ============
    /// Signature does not validate against the trusted key
    InvalidSignature,

    /// Publish time is earlier than the claimed current time
    Timing { publish_time: u64, current_time: u64 },

    /// Publish time is outside the freshness window (strict policy only)
    PriceOutsideFreshnessWindow {
        publish_time: u64,
        current_time: u64,
        window: u64,
    },

    /// Non-positive mean price or negative confidence (strict policy only)
    InvalidPriceData {
        mean_price: i64,
        confidence_interval: i64,
    },

    // ============ Input Validation Errors ============
    /// Invalid input parameter
    InvalidInput { param: &'static str, reason: &'static str },

    // ============ State Errors ============
    /// Proposed output state does not follow from the input state
    InvalidStateTransition,

    /// Verifier state not found in transaction
    StateNotFound,

    /// Spell spends or creates the wrong number of verifier states
    StateCountMismatch { inputs: usize, outputs: usize },
}

impl ZkPythError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::StaleState { .. } => "E001_STALE_STATE",
            Self::NotInitialized => "E002_NOT_INITIALIZED",
            Self::AlreadyInitialized => "E003_ALREADY_INITIALIZED",
            Self::InvalidPublicKey => "E004_INVALID_PUBLIC_KEY",
            Self::InvalidSignature => "E010_INVALID_SIGNATURE",
            Self::Timing { .. } => "E011_TIMING",
            Self::PriceOutsideFreshnessWindow { .. } => "E012_OUTSIDE_WINDOW",
            Self::InvalidPriceData { .. } => "E013_INVALID_PRICE_DATA",
            Self::InvalidInput { .. } => "E020_INVALID_INPUT",
            Self::InvalidStateTransition => "E030_INVALID_STATE",
            Self::StateNotFound => "E031_STATE_NOT_FOUND",
            Self::StateCountMismatch { .. } => "E032_STATE_COUNT",
        }
    }

    /// Returns true if the caller can fix this by rebuilding the call.
    ///
    /// A stale read is fixed by re-fetching the registry state; nothing
    /// else changes by resubmitting the same attestation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::StaleState { .. })
    }
}

impl fmt::Display for ZkPythError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleState { .. } => {
                write!(f, "{}: trusted key differs from expected snapshot", self.code())
            }
            Self::Timing {
                publish_time,
                current_time,
            } => write!(
                f,
                "{}: publish time {} is before current time {}",
                self.code(),
                publish_time,
                current_time
            ),
            Self::PriceOutsideFreshnessWindow {
                publish_time,
                current_time,
                window,
            } => write!(
                f,
                "{}: publish time {} + {} is before current time {}",
                self.code(),
                publish_time,
                window,
                current_time
            ),
            Self::InvalidPriceData {
                mean_price,
                confidence_interval,
            } => write!(
                f,
                "{}: mean price {} confidence {}",
                self.code(),
                mean_price,
                confidence_interval
            ),
            Self::InvalidInput { param, reason } => {
                write!(f, "{}: {} {}", self.code(), param, reason)
            }
            Self::StateCountMismatch { inputs, outputs } => write!(
                f,
                "{}: {} verifier inputs, {} verifier outputs",
                self.code(),
                inputs,
                outputs
            ),
            _ => f.write_str(self.code()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZkPythError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_error_codes_unique() {
        let errors = [
            ZkPythError::StaleState {
                expected: [0u8; 32],
                actual: [1u8; 32],
            },
            ZkPythError::NotInitialized,
            ZkPythError::AlreadyInitialized,
            ZkPythError::InvalidPublicKey,
            ZkPythError::InvalidSignature,
            ZkPythError::Timing {
                publish_time: 100,
                current_time: 200,
            },
            ZkPythError::PriceOutsideFreshnessWindow {
                publish_time: 0,
                current_time: 1_000,
                window: 300,
            },
            ZkPythError::InvalidPriceData {
                mean_price: -5,
                confidence_interval: 0,
            },
            ZkPythError::InvalidInput {
                param: "key",
                reason: "missing",
            },
            ZkPythError::InvalidStateTransition,
            ZkPythError::StateNotFound,
            ZkPythError::StateCountMismatch {
                inputs: 0,
                outputs: 2,
            },
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: BTreeSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes must be unique");
    }

    #[test]
    fn test_only_stale_state_is_recoverable() {
        assert!(ZkPythError::StaleState {
            expected: [0u8; 32],
            actual: [1u8; 32],
        }
        .is_recoverable());
        assert!(!ZkPythError::InvalidSignature.is_recoverable());
        assert!(!ZkPythError::Timing {
            publish_time: 100,
            current_time: 200,
        }
        .is_recoverable());
    }

    #[test]
    fn test_display_includes_code() {
        let err = ZkPythError::Timing {
            publish_time: 100,
            current_time: 200,
        };
        assert_eq!(
            err.to_string(),
            "E011_TIMING: publish time 100 is before current time 200"
        );
        assert_eq!(ZkPythError::InvalidSignature.to_string(), "E010_INVALID_SIGNATURE");
    }
}
