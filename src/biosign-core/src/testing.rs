//! In-memory doubles for the platform seams.
//!
//! These stand in for the OS key store, the biometric prompt, and the
//! version query in tests and host-side development builds. The key store
//! double signs with ephemeral ECDSA P-256 keys: signatures are real and
//! verifiable, while the requested RSA generation parameters are recorded
//! for assertions instead of being honored.

use std::collections::HashMap;
use std::sync::Mutex;

use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::rand_core::OsRng;

use crate::error::KeyStoreError;
use crate::platform::{
    BiometricService, ChallengeCompletion, ChallengeOutcome, PlatformInfo, SecureKeyStore,
    SigningOperation,
};
use crate::prompt::ChallengeDescriptor;
use crate::types::{Authenticators, CanAuthenticate, KeySpec, SignatureAlgorithm};

/// Platform double reporting a fixed API level.
#[derive(Debug, Clone, Copy)]
pub struct FixedPlatform {
    api_level: u32,
}

impl FixedPlatform {
    /// Create a platform double at the given API level.
    #[must_use]
    pub fn new(api_level: u32) -> Self {
        Self { api_level }
    }
}

impl PlatformInfo for FixedPlatform {
    fn api_level(&self) -> u32 {
        self.api_level
    }
}

struct StoredKey {
    signing_key: SigningKey,
    spec: KeySpec,
}

/// Key store double holding ephemeral P-256 keys in memory.
#[derive(Default)]
pub struct InMemoryKeyStore {
    keys: Mutex<HashMap<String, StoredKey>>,
}

impl InMemoryKeyStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The generation parameters recorded for `alias`, if a key exists.
    #[must_use]
    pub fn recorded_spec(&self, alias: &str) -> Option<KeySpec> {
        let keys = self.keys.lock().expect("key store lock poisoned");
        keys.get(alias).map(|key| key.spec.clone())
    }

    /// Verifying key for `alias`, for asserting produced signatures.
    #[must_use]
    pub fn verifying_key(&self, alias: &str) -> Option<VerifyingKey> {
        let keys = self.keys.lock().expect("key store lock poisoned");
        keys.get(alias).map(|key| *key.signing_key.verifying_key())
    }

    /// Number of live key records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.lock().expect("key store lock poisoned").len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecureKeyStore for InMemoryKeyStore {
    fn generate_key_pair(&self, alias: &str, spec: &KeySpec) -> Result<Vec<u8>, KeyStoreError> {
        let signing_key = SigningKey::random(&mut OsRng);
        let public_key = signing_key
            .verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();

        let mut keys = self.keys.lock().expect("key store lock poisoned");
        keys.insert(
            alias.to_string(),
            StoredKey {
                signing_key,
                spec: spec.clone(),
            },
        );
        Ok(public_key)
    }

    fn delete_entry(&self, alias: &str) -> Result<(), KeyStoreError> {
        let mut keys = self.keys.lock().expect("key store lock poisoned");
        match keys.remove(alias) {
            Some(_) => Ok(()),
            None => Err(KeyStoreError::NotFound {
                alias: alias.to_string(),
            }),
        }
    }

    fn contains_alias(&self, alias: &str) -> Result<bool, KeyStoreError> {
        let keys = self.keys.lock().expect("key store lock poisoned");
        Ok(keys.contains_key(alias))
    }

    fn begin_signing(
        &self,
        alias: &str,
        algorithm: SignatureAlgorithm,
    ) -> Result<Box<dyn SigningOperation>, KeyStoreError> {
        let keys = self.keys.lock().expect("key store lock poisoned");
        let stored = keys.get(alias).ok_or_else(|| KeyStoreError::NotFound {
            alias: alias.to_string(),
        })?;

        if algorithm.digest() != stored.spec.digest {
            return Err(KeyStoreError::Rejected {
                reason: format!(
                    "algorithm {algorithm} does not match key digest {:?}",
                    stored.spec.digest
                ),
            });
        }

        Ok(Box::new(InMemorySigningOperation {
            signing_key: stored.signing_key.clone(),
        }))
    }
}

struct InMemorySigningOperation {
    signing_key: SigningKey,
}

impl SigningOperation for InMemorySigningOperation {
    fn finalize(self: Box<Self>, payload: &[u8]) -> Result<Vec<u8>, KeyStoreError> {
        let signature: Signature = self.signing_key.sign(payload);
        Ok(signature.to_vec())
    }
}

/// Key store double that fails every operation.
///
/// Used to exercise the degradation paths (best-effort existence checks,
/// deletion failures).
pub struct FailingKeyStore;

impl FailingKeyStore {
    fn failure() -> KeyStoreError {
        KeyStoreError::failure("store unavailable")
    }
}

impl SecureKeyStore for FailingKeyStore {
    fn generate_key_pair(&self, _alias: &str, _spec: &KeySpec) -> Result<Vec<u8>, KeyStoreError> {
        Err(Self::failure())
    }

    fn delete_entry(&self, _alias: &str) -> Result<(), KeyStoreError> {
        Err(Self::failure())
    }

    fn contains_alias(&self, _alias: &str) -> Result<bool, KeyStoreError> {
        Err(Self::failure())
    }

    fn begin_signing(
        &self,
        _alias: &str,
        _algorithm: SignatureAlgorithm,
    ) -> Result<Box<dyn SigningOperation>, KeyStoreError> {
        Err(Self::failure())
    }
}

/// The terminal outcome a [`ScriptedBiometricService`] delivers.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Authenticate successfully, returning any crypto binding.
    Succeed,
    /// Fail with a platform error code and message.
    Error {
        /// Platform error code.
        code: i32,
        /// Platform error message.
        message: String,
    },
}

/// Challenge-service double with a scripted capability status and outcome.
///
/// Resolves every challenge immediately on the calling context and records
/// the last descriptor for assertions.
pub struct ScriptedBiometricService {
    status: CanAuthenticate,
    outcome: Mutex<ScriptedOutcome>,
    last_descriptor: Mutex<Option<ChallengeDescriptor>>,
}

impl ScriptedBiometricService {
    /// A service where authentication is available and every ceremony
    /// succeeds.
    #[must_use]
    pub fn succeeding() -> Self {
        Self {
            status: CanAuthenticate::Success,
            outcome: Mutex::new(ScriptedOutcome::Succeed),
            last_descriptor: Mutex::new(None),
        }
    }

    /// A service whose ceremonies end with the given platform error.
    #[must_use]
    pub fn erroring(code: i32, message: impl Into<String>) -> Self {
        Self {
            status: CanAuthenticate::Success,
            outcome: Mutex::new(ScriptedOutcome::Error {
                code,
                message: message.into(),
            }),
            last_descriptor: Mutex::new(None),
        }
    }

    /// A service reporting the given capability status.
    #[must_use]
    pub fn with_status(status: CanAuthenticate) -> Self {
        Self {
            status,
            outcome: Mutex::new(ScriptedOutcome::Succeed),
            last_descriptor: Mutex::new(None),
        }
    }

    /// Replace the scripted ceremony outcome.
    pub fn script(&self, outcome: ScriptedOutcome) {
        *self.outcome.lock().expect("outcome lock poisoned") = outcome;
    }

    /// The descriptor of the most recent challenge, if any.
    #[must_use]
    pub fn last_descriptor(&self) -> Option<ChallengeDescriptor> {
        self.last_descriptor
            .lock()
            .expect("descriptor lock poisoned")
            .clone()
    }
}

impl BiometricService for ScriptedBiometricService {
    fn can_authenticate(&self, _authenticators: Authenticators) -> CanAuthenticate {
        self.status
    }

    fn authenticate(
        &self,
        descriptor: &ChallengeDescriptor,
        binding: Option<Box<dyn SigningOperation>>,
        completion: ChallengeCompletion,
    ) {
        *self
            .last_descriptor
            .lock()
            .expect("descriptor lock poisoned") = Some(descriptor.clone());

        let outcome = self.outcome.lock().expect("outcome lock poisoned").clone();
        match outcome {
            ScriptedOutcome::Succeed => {
                completion.resolve(ChallengeOutcome::Succeeded { binding });
            }
            ScriptedOutcome::Error { code, message } => {
                completion.resolve(ChallengeOutcome::Error { code, message });
            }
        }
    }
}
