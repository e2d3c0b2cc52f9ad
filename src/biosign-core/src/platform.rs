//! Trait seams for the platform collaborators.
//!
//! The secure key store, the biometric challenge service, and the platform
//! version query are external facilities owned by the operating system.
//! This crate drives them through the narrow interfaces below; platform
//! adapters (JNI, Objective-C bridges, test doubles) implement them.

use tokio::sync::oneshot;
use tracing::warn;

use crate::error::KeyStoreError;
use crate::prompt::ChallengeDescriptor;
use crate::types::{Authenticators, BiometryType, CanAuthenticate, KeySpec, SignatureAlgorithm};

/// Challenge error code: the user tapped the negative button.
pub const ERROR_NEGATIVE_BUTTON: i32 = 13;

/// Challenge error code: the user dismissed the challenge.
pub const ERROR_USER_CANCELED: i32 = 10;

/// Whether a challenge error code represents a user cancellation.
#[must_use]
pub const fn is_user_cancellation(code: i32) -> bool {
    matches!(code, ERROR_NEGATIVE_BUTTON | ERROR_USER_CANCELED)
}

/// Platform version query.
pub trait PlatformInfo: Send + Sync {
    /// API level of the running platform.
    fn api_level(&self) -> u32;
}

/// A signing operation bound to a private key held inside the secure store.
///
/// The operation is created before the challenge, attached to it as the
/// crypto binding, and finalized only after the ceremony succeeds. The
/// private key never crosses this boundary.
pub trait SigningOperation: Send {
    /// Sign the payload and consume the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the store refuses to finalize, e.g. because the
    /// required fresh authentication is missing.
    fn finalize(self: Box<Self>, payload: &[u8]) -> Result<Vec<u8>, KeyStoreError>;
}

/// Secure, hardware-backed key store keyed by alias.
///
/// All operations are synchronous and safe to invoke off the UI context;
/// the store serializes access to a given alias internally.
pub trait SecureKeyStore: Send + Sync {
    /// Generate a keypair under `alias` with the given parameters and
    /// return the public key, DER-encoded (SubjectPublicKeyInfo).
    ///
    /// Replaces nothing: callers wanting replace semantics delete first.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::Rejected`] if the store refuses the
    /// parameters, or [`KeyStoreError::Failure`] on any other store error.
    fn generate_key_pair(&self, alias: &str, spec: &KeySpec) -> Result<Vec<u8>, KeyStoreError>;

    /// Delete the entry under `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::NotFound`] if no entry exists.
    fn delete_entry(&self, alias: &str) -> Result<(), KeyStoreError>;

    /// Whether an entry exists under `alias`.
    fn contains_alias(&self, alias: &str) -> Result<bool, KeyStoreError>;

    /// Obtain a signing operation over the private key under `alias`.
    ///
    /// The algorithm must match the digest the key was generated with.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::NotFound`] if no key exists, or
    /// [`KeyStoreError::Rejected`] on an algorithm mismatch.
    fn begin_signing(
        &self,
        alias: &str,
        algorithm: SignatureAlgorithm,
    ) -> Result<Box<dyn SigningOperation>, KeyStoreError>;
}

/// Terminal result delivered by the challenge service.
///
/// Cancellation travels as an `Error` with a platform cancellation code
/// ([`ERROR_NEGATIVE_BUTTON`] / [`ERROR_USER_CANCELED`]), mirroring the
/// platform callback contract; the ceremony controller translates it.
pub enum ChallengeOutcome {
    /// Authentication succeeded. For crypto-bound challenges the unlocked
    /// signing operation is handed back.
    Succeeded {
        /// The crypto binding passed into [`BiometricService::authenticate`],
        /// now authorized for one finalize.
        binding: Option<Box<dyn SigningOperation>>,
    },
    /// Authentication ended with a platform error code.
    Error {
        /// Platform error code.
        code: i32,
        /// Platform error message.
        message: String,
    },
}

impl std::fmt::Debug for ChallengeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded { binding } => f
                .debug_struct("Succeeded")
                .field("binding", &binding.is_some())
                .finish(),
            Self::Error { code, message } => f
                .debug_struct("Error")
                .field("code", code)
                .field("message", message)
                .finish(),
        }
    }
}

/// One-shot completion handle for a challenge.
///
/// Resolving consumes the handle, so a challenge can never report two
/// terminal outcomes. Dropping without resolving is logged and surfaces to
/// the controller as an abandoned challenge.
pub struct ChallengeCompletion {
    tx: Option<oneshot::Sender<ChallengeOutcome>>,
}

impl ChallengeCompletion {
    /// Create a completion handle and the receiver the controller awaits.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<ChallengeOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Deliver the terminal outcome, consuming the handle.
    pub fn resolve(mut self, outcome: ChallengeOutcome) {
        if let Some(tx) = self.tx.take() {
            if tx.send(outcome).is_err() {
                warn!("challenge completion: controller no longer waiting");
            }
        }
    }
}

impl Drop for ChallengeCompletion {
    fn drop(&mut self) {
        if self.tx.is_some() {
            warn!("challenge completion dropped without a terminal outcome");
        }
    }
}

/// Biometric/credential challenge service.
///
/// Adapters wrap the platform's authentication prompt. Presenting the
/// challenge must happen on the execution context that owns the UI; that
/// is an environmental precondition of the adapter, not enforced here.
pub trait BiometricService: Send + Sync {
    /// Query whether an authenticator matching `authenticators` can be
    /// used right now. Read-only, safe to call repeatedly.
    fn can_authenticate(&self, authenticators: Authenticators) -> CanAuthenticate;

    /// Modality this device reports for successful availability queries.
    fn biometry_type(&self) -> BiometryType {
        BiometryType::Biometrics
    }

    /// Present the challenge described by `descriptor`.
    ///
    /// `binding`, when present, attaches a signing operation to the
    /// challenge; the platform returns it through
    /// [`ChallengeOutcome::Succeeded`] once the user has authenticated.
    /// Exactly one outcome must be delivered through `completion`.
    fn authenticate(
        &self,
        descriptor: &ChallengeDescriptor,
        binding: Option<Box<dyn SigningOperation>>,
        completion: ChallengeCompletion,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_codes() {
        assert!(is_user_cancellation(ERROR_NEGATIVE_BUTTON));
        assert!(is_user_cancellation(ERROR_USER_CANCELED));
        assert!(!is_user_cancellation(0));
        assert!(!is_user_cancellation(5));
    }

    #[tokio::test]
    async fn completion_delivers_exactly_once() {
        let (completion, rx) = ChallengeCompletion::channel();
        completion.resolve(ChallengeOutcome::Error {
            code: 5,
            message: "timeout".into(),
        });
        match rx.await.unwrap() {
            ChallengeOutcome::Error { code, .. } => assert_eq!(code, 5),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dropped_completion_closes_channel() {
        let (completion, rx) = ChallengeCompletion::channel();
        drop(completion);
        assert!(rx.await.is_err());
    }
}
