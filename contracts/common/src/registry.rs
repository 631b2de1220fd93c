//! Trusted Key Registry
//!
//! Holds the single trusted provider key. The key is committed exactly once
//! and never rotated. Every read used for verification goes through
//! [`KeyRegistry::get_and_assert_equals`], which fails if the committed key
//! is not the snapshot the caller built its call against.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{ZkPythError, ZkPythResult};
use crate::signing::decode_trusted_key;
use crate::types::TrustedKey;

/// Registry of the trusted provider key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct KeyRegistry {
    key: Option<TrustedKey>,
}

impl KeyRegistry {
    /// Create an empty, uninitialized registry
    pub fn new() -> Self {
        Self { key: None }
    }

    /// Create a registry with the key already committed
    pub fn with_key(key: TrustedKey) -> ZkPythResult<Self> {
        let mut registry = Self::new();
        registry.initialize(key)?;
        Ok(registry)
    }

    /// Commit the trusted key.
    ///
    /// # Errors
    /// - `AlreadyInitialized` if a key is already committed (it is kept)
    /// - `InvalidPublicKey` if the bytes are not an ed25519 point
    pub fn initialize(&mut self, key: TrustedKey) -> ZkPythResult<()> {
        if self.key.is_some() {
            warn!(code = ZkPythError::AlreadyInitialized.code(), "rejected re-initialization of trusted key");
            return Err(ZkPythError::AlreadyInitialized);
        }
        decode_trusted_key(&key)?;
        self.key = Some(key);
        Ok(())
    }

    /// Whether a key has been committed
    pub fn is_initialized(&self) -> bool {
        self.key.is_some()
    }

    /// The committed key
    pub fn get(&self) -> ZkPythResult<TrustedKey> {
        self.key.ok_or(ZkPythError::NotInitialized)
    }

    /// The committed key, asserted equal to the caller's snapshot
    pub fn get_and_assert_equals(&self, expected: &TrustedKey) -> ZkPythResult<TrustedKey> {
        let actual = self.get()?;
        if actual != *expected {
            return Err(ZkPythError::StaleState {
                expected: expected.0,
                actual: actual.0,
            });
        }
        Ok(actual)
    }
}
