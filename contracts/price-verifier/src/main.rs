//! zkPyth Price Verifier - Charms App Entry Point
//!
//! This app validates price attestation checks on Bitcoin using client-side validation.
//!
//! ## What This App Validates
//!
//! - **Initialize**: Commits the trusted Pyth provider key, once
//! - **Verify**: Checks a provider-signed price attestation and appends a
//!   `pythCheck` receipt to the verifier charm
//!
//! ```text
//! Verify spell:
//!   INS:  [Verifier charm]     <- Spent
//!   OUTS: [Verifier charm]     <- Recreated with one more receipt
//! ```
//!
//! Downstream apps reference the verifier charm (without spending it) to
//! check that an attestation id was verified.

use charms_sdk::data::{App, Data, Transaction};

/// Main validation function for price verifier operations.
///
/// # Arguments
/// * `app` - The price verifier app definition
/// * `tx` - The transaction being validated
/// * `x` - Public inputs
/// * `w` - Witness data (operation details)
///
/// # Returns
/// `true` if the operation is valid, `false` otherwise
pub fn app_contract(app: &App, tx: &Transaction, x: &Data, w: &Data) -> bool {
    zkpyth_price_verifier::charms::validate_verifier_operation(app, tx, x, w)
}

// Use the Charms SDK main macro to generate the entry point
charms_sdk::main!(app_contract);
