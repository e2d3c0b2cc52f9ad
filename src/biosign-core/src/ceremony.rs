//! Signing ceremony controller.
//!
//! Drives one authentication challenge from issue to terminal outcome:
//! `Idle -> ChallengeIssued -> {Succeeded, Cancelled, Failed}`. One
//! ceremony per invocation; there is no retry loop here, the caller
//! re-invokes if it wants another attempt.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, info, warn};

use crate::error::BiometricError;
use crate::platform::{
    is_user_cancellation, BiometricService, ChallengeCompletion, ChallengeOutcome, PlatformInfo,
    SecureKeyStore,
};
use crate::policy::{self, MIN_API_LEVEL};
use crate::prompt;
use crate::types::CeremonyOutcome;

/// Request for a crypto-bound signing ceremony.
#[derive(Debug, Clone)]
pub struct SignatureRequest {
    /// Title for the authentication dialog.
    pub prompt_message: String,
    /// Bytes to sign after a successful ceremony.
    pub payload: Vec<u8>,
    /// Cancel button label (shown when fallback is inactive).
    pub cancel_button_text: String,
    /// Whether device-credential fallback may be offered.
    pub allow_device_credentials: bool,
}

/// Request for a presence-only prompt (no signature).
#[derive(Debug, Clone)]
pub struct PromptRequest {
    /// Title for the authentication dialog.
    pub prompt_message: String,
    /// Cancel button label (shown when fallback is inactive).
    pub cancel_button_text: String,
    /// Whether device-credential fallback may be offered.
    pub allow_device_credentials: bool,
}

/// Orchestrates authentication challenges and crypto-bound signing.
///
/// A single outstanding ceremony at a time is assumed. Concurrent `sign`
/// calls are not serialized here; preventing overlap is the caller's
/// responsibility, as the platform prompt itself admits only one dialog.
pub struct CeremonyController {
    platform: Arc<dyn PlatformInfo>,
    store: Arc<dyn SecureKeyStore>,
    biometrics: Arc<dyn BiometricService>,
    alias: String,
}

impl CeremonyController {
    /// Create a controller over the given collaborators.
    #[must_use]
    pub fn new(
        platform: Arc<dyn PlatformInfo>,
        store: Arc<dyn SecureKeyStore>,
        biometrics: Arc<dyn BiometricService>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            store,
            biometrics,
            alias: alias.into(),
        }
    }

    fn check_floor(&self) -> Result<u32, BiometricError> {
        let api_level = self.platform.api_level();
        if api_level < MIN_API_LEVEL {
            return Err(BiometricError::UnsupportedPlatform {
                api_level,
                minimum: MIN_API_LEVEL,
            });
        }
        Ok(api_level)
    }

    /// Run a signing ceremony over `request.payload`.
    ///
    /// The signing algorithm is selected from the same version tier that
    /// generated the key, the private-key handle is bound to the challenge,
    /// and the signature is finalized only after the user authenticates.
    /// The signature is returned standard-base64 encoded.
    ///
    /// # Errors
    ///
    /// Precondition failures reject the ceremony:
    /// [`BiometricError::UnsupportedPlatform`] below the floor,
    /// [`BiometricError::KeyStore`] when the signing operation cannot be
    /// prepared (including a missing key). Challenge-time platform errors
    /// are NOT errors here; they surface as [`CeremonyOutcome::Failed`],
    /// and user cancellation as [`CeremonyOutcome::Cancelled`].
    pub async fn sign(&self, request: SignatureRequest) -> Result<CeremonyOutcome, BiometricError> {
        let api_level = self.check_floor()?;

        // Must match the digest used at generation or the store rejects it.
        let algorithm = policy::signature_algorithm(api_level).ok_or(
            BiometricError::UnsupportedPlatform {
                api_level,
                minimum: MIN_API_LEVEL,
            },
        )?;

        let operation = self
            .store
            .begin_signing(&self.alias, algorithm)
            .map_err(|err| BiometricError::KeyStore {
                reason: err.to_string(),
            })?;

        let descriptor = prompt::build_challenge_descriptor(
            request.prompt_message,
            request.cancel_button_text,
            request.allow_device_credentials,
            api_level,
        );

        debug!(alias = %self.alias, %algorithm, "signing ceremony: challenge issued");
        let (completion, outcome) = ChallengeCompletion::channel();
        self.biometrics
            .authenticate(&descriptor, Some(operation), completion);

        match Self::await_outcome(outcome).await? {
            ChallengeOutcome::Succeeded { binding } => {
                let Some(operation) = binding else {
                    // Platform contract violation: a crypto-bound challenge
                    // must return its binding on success.
                    warn!(alias = %self.alias, "challenge succeeded without crypto binding");
                    return Err(BiometricError::ChallengeFailed {
                        code: 0,
                        message: "authentication succeeded without a crypto binding".into(),
                    });
                };

                let signature =
                    operation
                        .finalize(&request.payload)
                        .map_err(|err| BiometricError::KeyStore {
                            reason: err.to_string(),
                        })?;

                info!(alias = %self.alias, "signing ceremony succeeded");
                Ok(CeremonyOutcome::Succeeded {
                    signature: Some(BASE64.encode(signature)),
                })
            }
            ChallengeOutcome::Error { code, message } => Ok(Self::terminal_error(code, message)),
        }
    }

    /// Run a presence-only prompt with no crypto binding.
    ///
    /// # Errors
    ///
    /// [`BiometricError::UnsupportedPlatform`] below the version floor.
    pub async fn prompt(&self, request: PromptRequest) -> Result<CeremonyOutcome, BiometricError> {
        let api_level = self.check_floor()?;

        let descriptor = prompt::build_challenge_descriptor(
            request.prompt_message,
            request.cancel_button_text,
            request.allow_device_credentials,
            api_level,
        );

        debug!("presence prompt: challenge issued");
        let (completion, outcome) = ChallengeCompletion::channel();
        self.biometrics.authenticate(&descriptor, None, completion);

        match Self::await_outcome(outcome).await? {
            ChallengeOutcome::Succeeded { .. } => {
                info!("presence prompt succeeded");
                Ok(CeremonyOutcome::Succeeded { signature: None })
            }
            ChallengeOutcome::Error { code, message } => Ok(Self::terminal_error(code, message)),
        }
    }

    async fn await_outcome(
        outcome: tokio::sync::oneshot::Receiver<ChallengeOutcome>,
    ) -> Result<ChallengeOutcome, BiometricError> {
        outcome.await.map_err(|_| BiometricError::ChallengeFailed {
            code: -1,
            message: "challenge abandoned without a terminal outcome".into(),
        })
    }

    fn terminal_error(code: i32, message: String) -> CeremonyOutcome {
        if is_user_cancellation(code) {
            debug!(code, "ceremony cancelled by user");
            CeremonyOutcome::Cancelled
        } else {
            warn!(code, %message, "ceremony failed");
            CeremonyOutcome::Failed { code, message }
        }
    }
}
