//! Facade wiring the prober, key lifecycle, and ceremony controller.

use std::sync::Arc;

use crate::ceremony::{CeremonyController, PromptRequest, SignatureRequest};
use crate::config::ModuleConfig;
use crate::error::BiometricError;
use crate::keys::KeyLifecycleManager;
use crate::platform::{BiometricService, PlatformInfo, SecureKeyStore};
use crate::prober::CapabilityProber;
use crate::types::{AvailabilityResult, CeremonyOutcome};

/// One biometric signing module instance.
///
/// Owns the three orchestration components over a shared set of platform
/// collaborators and a single key alias. Multiple instances with distinct
/// aliases can coexist.
pub struct BiometricModule {
    prober: CapabilityProber,
    keys: KeyLifecycleManager,
    ceremony: CeremonyController,
}

impl BiometricModule {
    /// Assemble a module from its configuration and collaborators.
    #[must_use]
    pub fn new(
        config: ModuleConfig,
        platform: Arc<dyn PlatformInfo>,
        store: Arc<dyn SecureKeyStore>,
        biometrics: Arc<dyn BiometricService>,
    ) -> Self {
        Self {
            prober: CapabilityProber::new(platform.clone(), biometrics.clone()),
            keys: KeyLifecycleManager::new(
                platform.clone(),
                store.clone(),
                config.key_alias.clone(),
            ),
            ceremony: CeremonyController::new(platform, store, biometrics, config.key_alias),
        }
    }

    /// See [`CapabilityProber::check_availability`].
    #[must_use]
    pub fn check_availability(&self, allow_device_credentials: bool) -> AvailabilityResult {
        self.prober.check_availability(allow_device_credentials)
    }

    /// See [`KeyLifecycleManager::create_key_pair`].
    pub fn create_key_pair(&self) -> Result<String, BiometricError> {
        self.keys.create_key_pair()
    }

    /// See [`KeyLifecycleManager::delete_key_pair`].
    pub fn delete_key_pair(&self) -> Result<bool, BiometricError> {
        self.keys.delete_key_pair()
    }

    /// See [`KeyLifecycleManager::key_exists`].
    #[must_use]
    pub fn key_exists(&self) -> bool {
        self.keys.key_exists()
    }

    /// See [`CeremonyController::sign`].
    pub async fn sign(&self, request: SignatureRequest) -> Result<CeremonyOutcome, BiometricError> {
        self.ceremony.sign(request).await
    }

    /// See [`CeremonyController::prompt`].
    pub async fn prompt(&self, request: PromptRequest) -> Result<CeremonyOutcome, BiometricError> {
        self.ceremony.prompt(request).await
    }
}
