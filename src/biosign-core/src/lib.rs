//! # biosign-core
//!
//! Device biometric authentication and hardware-backed asymmetric signing,
//! orchestrated over the operating system's secure key store and
//! authentication prompt.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     BiometricModule                          │
//! │                                                              │
//! │  ┌──────────────────┐  ┌─────────────────────┐              │
//! │  │ CapabilityProber │  │ KeyLifecycleManager │              │
//! │  │ (read-only query)│  │ (replace-on-create) │              │
//! │  └──────────────────┘  └─────────────────────┘              │
//! │            │                      │                          │
//! │            ▼                      ▼                          │
//! │  ┌──────────────────────────────────────────────────┐       │
//! │  │              CeremonyController                   │       │
//! │  │   (one challenge, one terminal outcome)          │       │
//! │  └──────────────────────────────────────────────────┘       │
//! │            │                      │                          │
//! │            ▼                      ▼                          │
//! │   BiometricService         SecureKeyStore                    │
//! │   (platform prompt)        (platform key store)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The private key never leaves the platform store: the store hands out an
//! opaque [`SigningOperation`](platform::SigningOperation) that is bound to
//! the challenge and finalized only after a successful ceremony.
//!
//! ## Version policy
//!
//! Key generation parameters, the signing algorithm, and the allowed
//! authenticator classes are all selected from one version-gated policy
//! table ([`policy`]), so they can never drift apart.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use biosign_core::{BiometricModule, ModuleConfig, SignatureRequest};
//!
//! let module = BiometricModule::new(
//!     ModuleConfig::default(),
//!     platform,   // Arc<dyn PlatformInfo>
//!     key_store,  // Arc<dyn SecureKeyStore>
//!     biometrics, // Arc<dyn BiometricService>
//! );
//!
//! let public_key = module.create_key_pair()?;
//! let outcome = module
//!     .sign(SignatureRequest {
//!         prompt_message: "Confirm payment".into(),
//!         payload: b"order-4711".to_vec(),
//!         cancel_button_text: "Cancel".into(),
//!         allow_device_credentials: false,
//!     })
//!     .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::pedantic)] // Too strict for production code
#![allow(clippy::doc_markdown)] // Allow product names without backticks
#![allow(clippy::missing_errors_doc)] // Error documentation not required
#![allow(clippy::missing_panics_doc)] // Panic documentation not required
#![allow(clippy::module_name_repetitions)] // Allow Type in module::Type
#![allow(clippy::must_use_candidate)] // Not all functions need must_use

pub mod ceremony;
pub mod config;
pub mod error;
pub mod keys;
pub mod module;
pub mod platform;
pub mod policy;
pub mod prober;
pub mod prompt;
pub mod testing;
pub mod types;

pub use ceremony::{CeremonyController, PromptRequest, SignatureRequest};
pub use config::ModuleConfig;
pub use error::{BiometricError, KeyStoreError};
pub use keys::KeyLifecycleManager;
pub use module::BiometricModule;
pub use prober::CapabilityProber;
pub use prompt::{build_challenge_descriptor, ChallengeDescriptor};
pub use types::{
    AvailabilityResult, Authenticators, BiometryType, CanAuthenticate, CeremonyOutcome, Digest,
    KeySpec, SignatureAlgorithm, SignaturePadding, UnavailableReason,
};
