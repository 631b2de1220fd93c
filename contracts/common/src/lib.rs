//! zkPyth Common Library
//!
//! Shared types, constants, and verification primitives for the zkPyth
//! price attestation verifier.
//!
//! ## What Lives Here
//!
//! - **Key Registry**: the single trusted signer key, committed exactly once
//! - **Signing**: the canonical signed message for a price attestation and
//!   ed25519 verification against the trusted key
//! - **Events**: append-only receipts of verified attestations
//! - **Errors**: typed failures with stable codes
//!
//! The verifier state machine itself lives in `zkpyth-price-verifier`; this
//! crate holds everything that other apps reading receipts also need.
//!
//! This crate is `no_std` compatible for WASM compilation when built
//! without the default `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export Vec for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::vec::Vec;
#[cfg(feature = "std")]
pub use std::vec::Vec;

pub mod constants;
pub mod errors;
pub mod types;
pub mod events;
pub mod signing;
pub mod registry;
pub mod validation;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use types::*;
pub use events::*;
pub use signing::{attestation_message, sign_attestation, verify_attestation_signature};
pub use registry::KeyRegistry;
