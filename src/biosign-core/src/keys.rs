//! Key lifecycle: creation, existence, and deletion of the biometric key.
//!
//! A single key record lives under a fixed alias. Creation always replaces
//! any prior record, so at most one live key exists at any time.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, info, warn};

use crate::error::{BiometricError, KeyStoreError};
use crate::platform::{PlatformInfo, SecureKeyStore};
use crate::policy::{self, MIN_API_LEVEL};

/// Manages the single named keypair in the secure key store.
pub struct KeyLifecycleManager {
    platform: Arc<dyn PlatformInfo>,
    store: Arc<dyn SecureKeyStore>,
    alias: String,
}

impl KeyLifecycleManager {
    /// Create a manager for the key under `alias`.
    #[must_use]
    pub fn new(
        platform: Arc<dyn PlatformInfo>,
        store: Arc<dyn SecureKeyStore>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            store,
            alias: alias.into(),
        }
    }

    /// Alias of the managed key.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Generate a fresh hardware-backed keypair, replacing any existing one.
    ///
    /// Any existing record under the alias is deleted first so no state
    /// from a prior generation can survive. Generation parameters come from
    /// the version-gated policy; key use always requires a fresh user
    /// authentication.
    ///
    /// Returns the public key as standard base64 (no line wrapping).
    ///
    /// # Errors
    ///
    /// [`BiometricError::UnsupportedPlatform`] below the version floor,
    /// [`BiometricError::KeyGeneration`] if the store rejects the
    /// parameters or fails.
    pub fn create_key_pair(&self) -> Result<String, BiometricError> {
        let api_level = self.platform.api_level();
        let policy = policy::generation_policy(api_level).ok_or(
            BiometricError::UnsupportedPlatform {
                api_level,
                minimum: MIN_API_LEVEL,
            },
        )?;

        // Replace, never accumulate: a leftover key from a prior install or
        // a failed generation must not shadow the new one.
        if let Err(err) = self.store.delete_entry(&self.alias) {
            match err {
                KeyStoreError::NotFound { .. } => {}
                other => debug!(alias = %self.alias, error = %other, "pre-create delete failed"),
            }
        }

        let spec = policy.key_spec();
        info!(
            alias = %self.alias,
            api_level,
            key_size = spec.key_size_bits,
            digest = ?spec.digest,
            "generating biometric keypair"
        );

        let public_key = self
            .store
            .generate_key_pair(&self.alias, &spec)
            .map_err(|err| BiometricError::KeyGeneration {
                reason: err.to_string(),
            })?;

        Ok(BASE64.encode(public_key))
    }

    /// Delete the keypair if it exists.
    ///
    /// Idempotent: returns `Ok(false)` when no key exists.
    ///
    /// # Errors
    ///
    /// [`BiometricError::KeyDeletion`] only on a store failure distinct
    /// from "not found".
    pub fn delete_key_pair(&self) -> Result<bool, BiometricError> {
        if !self.key_exists() {
            debug!(alias = %self.alias, "delete: no key present");
            return Ok(false);
        }

        match self.store.delete_entry(&self.alias) {
            Ok(()) => {
                info!(alias = %self.alias, "biometric keypair deleted");
                Ok(true)
            }
            // Raced with another deletion: the key is gone either way.
            Err(KeyStoreError::NotFound { .. }) => Ok(false),
            Err(err) => Err(BiometricError::KeyDeletion {
                reason: err.to_string(),
            }),
        }
    }

    /// Whether a key exists under the alias.
    ///
    /// Best-effort: store errors degrade to `false` rather than blocking
    /// the caller on store corruption.
    #[must_use]
    pub fn key_exists(&self) -> bool {
        match self.store.contains_alias(&self.alias) {
            Ok(exists) => exists,
            Err(err) => {
                warn!(alias = %self.alias, error = %err, "existence check failed, reporting absent");
                false
            }
        }
    }
}
