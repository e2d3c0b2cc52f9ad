//! Error types for biometric signing operations.

use thiserror::Error;

/// Errors that can occur while orchestrating biometric key operations.
///
/// User cancellation is deliberately NOT an error; it is a normal
/// [`CeremonyOutcome`](crate::types::CeremonyOutcome) variant.
#[derive(Debug, Error)]
pub enum BiometricError {
    /// Platform version is below the minimum supported floor.
    #[error("Unsupported platform version: API level {api_level} is below the minimum of {minimum}")]
    UnsupportedPlatform {
        /// API level reported by the platform.
        api_level: u32,
        /// Minimum API level required.
        minimum: u32,
    },

    /// Key generation was rejected by the secure key store.
    #[error("Key generation failed: {reason}")]
    KeyGeneration {
        /// Reason for the failure.
        reason: String,
    },

    /// Key deletion failed for a reason other than "not found".
    #[error("Key deletion failed: {reason}")]
    KeyDeletion {
        /// Reason for the failure.
        reason: String,
    },

    /// The secure key store failed an operation.
    #[error("Key store failure: {reason}")]
    KeyStore {
        /// Reason for the failure.
        reason: String,
    },

    /// The challenge service failed outside of user cancellation.
    #[error("Challenge failed ({code}): {message}")]
    ChallengeFailed {
        /// Platform diagnostic code.
        code: i32,
        /// Platform diagnostic message.
        message: String,
    },

    /// A caller-supplied request could not be interpreted.
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// Reason the request is invalid.
        reason: String,
    },
}

impl BiometricError {
    /// Create a key-store error from a reason.
    #[must_use]
    pub fn key_store(reason: impl Into<String>) -> Self {
        Self::KeyStore {
            reason: reason.into(),
        }
    }

    /// Create a key-generation error from a reason.
    #[must_use]
    pub fn key_generation(reason: impl Into<String>) -> Self {
        Self::KeyGeneration {
            reason: reason.into(),
        }
    }

    /// Create an invalid-request error from a reason.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the secure key store collaborator.
///
/// The store owns the key material; this crate only sees aliases and
/// handles. `NotFound` is distinguished so that idempotent deletion can
/// treat it as a non-error.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// No entry exists under the requested alias.
    #[error("Key not found: {alias}")]
    NotFound {
        /// The alias that was not found.
        alias: String,
    },

    /// The store rejected the requested generation parameters.
    #[error("Key parameters rejected: {reason}")]
    Rejected {
        /// Reason the parameters were rejected.
        reason: String,
    },

    /// Any other store failure.
    #[error("Key store failure: {reason}")]
    Failure {
        /// Reason for the failure.
        reason: String,
    },
}

impl KeyStoreError {
    /// Create a generic store failure from a reason.
    #[must_use]
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }
}
