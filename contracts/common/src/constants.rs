//! Protocol Constants
//!
//! All fixed values for the zkPyth verifier.
//!
//! # Verification Policy
//!
//! The freshness window and the price sanity predicates are computed on every
//! verification but only enforced when the deployment opts into the strict
//! policy (see `zkpyth-price-verifier`'s `strict-checks` feature).

/// Verifier Configuration
pub mod verifier {
    /// Maximum age, in time units, from publish time to the claimed current time
    pub const FRESHNESS_WINDOW: u64 = 300;

    /// Name of the event channel carrying verification receipts
    pub const EVENT_CHANNEL: &str = "pythCheck";

    /// Domain separator prepended to every signed attestation message
    pub const SIGNING_DOMAIN: &[u8] = b"zkpyth/price-attestation/v1";
}

/// Key Material Sizes
pub mod keys {
    /// Length of an ed25519 public key in bytes
    pub const PUBLIC_KEY_LEN: usize = 32;

    /// Length of an ed25519 signature in bytes
    pub const SIGNATURE_LEN: usize = 64;

    /// Length of an attestation (price feed) identifier in bytes
    pub const FEED_ID_LEN: usize = 32;
}
