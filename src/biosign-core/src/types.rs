//! Core types for biometric availability, key generation, and ceremonies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Biometry modality reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BiometryType {
    /// Fingerprint sensor (Apple naming).
    TouchId,
    /// Face recognition (Apple naming).
    FaceId,
    /// Generic strong biometrics (Android naming).
    #[default]
    Biometrics,
}

impl fmt::Display for BiometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TouchId => "TouchID",
            Self::FaceId => "FaceID",
            Self::Biometrics => "Biometrics",
        };
        f.write_str(s)
    }
}

/// Reason a biometric sensor is unavailable.
///
/// These are the only structured reason codes this module defines; every
/// other failure travels as a diagnostic message string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnavailableReason {
    /// The device has no biometric hardware.
    NoHardware,
    /// Biometric hardware exists but is currently unavailable.
    HardwareUnavailable,
    /// No biometrics are enrolled on the device.
    NoneEnrolled,
    /// The platform requires a security update before biometrics can be used.
    SecurityUpdateRequired,
    /// The platform version is below the supported floor.
    UnsupportedPlatformVersion,
}

impl UnavailableReason {
    /// Platform diagnostic string for this reason.
    ///
    /// These strings are part of the caller-facing contract and match the
    /// platform's own error vocabulary.
    #[must_use]
    pub const fn platform_code(&self) -> &'static str {
        match self {
            Self::NoHardware => "BIOMETRIC_ERROR_NO_HARDWARE",
            Self::HardwareUnavailable => "BIOMETRIC_ERROR_HW_UNAVAILABLE",
            Self::NoneEnrolled => "BIOMETRIC_ERROR_NONE_ENROLLED",
            Self::SecurityUpdateRequired => "BIOMETRIC_ERROR_SECURITY_UPDATE_REQUIRED",
            Self::UnsupportedPlatformVersion => "Unsupported platform version",
        }
    }
}

/// Result of a biometric availability query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityResult {
    /// A biometric authenticator satisfying the requested tier is usable.
    Available {
        /// Modality the platform reports.
        biometry_type: BiometryType,
    },
    /// No usable authenticator for the requested tier.
    Unavailable {
        /// Why authentication is unavailable.
        reason: UnavailableReason,
    },
}

impl AvailabilityResult {
    /// Whether the sensor is available.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

/// Status returned by the platform's authenticator capability query.
///
/// Platform adapters translate their native status codes into this
/// vocabulary before it reaches the prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanAuthenticate {
    /// An authenticator matching the requested mask can be used now.
    Success,
    /// No hardware for the requested authenticators.
    NoHardware,
    /// Hardware present but unavailable.
    HardwareUnavailable,
    /// Nothing enrolled for the requested authenticators.
    NoneEnrolled,
    /// A security update is required first.
    SecurityUpdateRequired,
}

/// Terminal result of one authentication ceremony.
///
/// Exactly one outcome is produced per ceremony. User cancellation is a
/// normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CeremonyOutcome {
    /// The user authenticated. Carries the transport-encoded signature for
    /// crypto-bound ceremonies, `None` for a plain presence prompt.
    Succeeded {
        /// Standard-base64 detached signature, when one was requested.
        signature: Option<String>,
    },
    /// The user dismissed the challenge. Not an error.
    Cancelled,
    /// The challenge service failed with a platform diagnostic.
    Failed {
        /// Platform error code.
        code: i32,
        /// Platform error message.
        message: String,
    },
}

/// Digest algorithm used for key generation and signing.
///
/// Ordered by strength so the version policy can assert monotonicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Digest {
    /// SHA-256.
    Sha256,
    /// SHA-512.
    Sha512,
}

impl Digest {
    /// Digest output size in bits.
    #[must_use]
    pub const fn strength_bits(&self) -> u32 {
        match self {
            Self::Sha256 => 256,
            Self::Sha512 => 512,
        }
    }
}

/// Signature padding scheme requested from the key store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignaturePadding {
    /// RSASSA-PKCS#1 v1.5.
    Pkcs1,
}

/// Signature algorithm bound to a signing operation.
///
/// Must match the digest the key was generated with, or the store rejects
/// the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// SHA-256 digest over RSASSA-PKCS#1 v1.5.
    Sha256WithRsa,
    /// SHA-512 digest over RSASSA-PKCS#1 v1.5.
    Sha512WithRsa,
}

impl SignatureAlgorithm {
    /// Digest component of this algorithm.
    #[must_use]
    pub const fn digest(&self) -> Digest {
        match self {
            Self::Sha256WithRsa => Digest::Sha256,
            Self::Sha512WithRsa => Digest::Sha512,
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sha256WithRsa => "SHA256withRSA",
            Self::Sha512WithRsa => "SHA512withRSA",
        };
        f.write_str(s)
    }
}

/// Parameters handed to the secure key store for key generation.
///
/// The store owns the resulting key record; this crate never sees raw key
/// material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    /// Modulus size in bits.
    pub key_size_bits: u32,
    /// Digest the key is generated for.
    pub digest: Digest,
    /// Signature padding scheme.
    pub padding: SignaturePadding,
    /// Whether key use requires a user authentication ceremony.
    pub user_authentication_required: bool,
    /// Whether every use requires a fresh authentication (no cached window).
    pub fresh_authentication_per_use: bool,
    /// Whether the store should additionally require user presence.
    pub user_presence_required: bool,
}

/// Bitmask of authenticator classes allowed for a challenge.
///
/// The numeric values mirror the platform's own constants so adapters can
/// pass the mask through unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Authenticators(u32);

impl Authenticators {
    /// Class 3 ("strong") biometric authenticators.
    pub const BIOMETRIC_STRONG: Self = Self(0x000F);

    /// Device credential (PIN, pattern, password).
    pub const DEVICE_CREDENTIAL: Self = Self(0x8000);

    /// Raw bitmask value.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Union of two masks.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether every bit of `other` is set in this mask.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Debug for Authenticators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Authenticators({})", self)
    }
}

impl fmt::Display for Authenticators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::BIOMETRIC_STRONG) {
            names.push("BIOMETRIC_STRONG");
        }
        if self.contains(Self::DEVICE_CREDENTIAL) {
            names.push("DEVICE_CREDENTIAL");
        }
        if names.is_empty() {
            write!(f, "{:#06x}", self.0)
        } else {
            f.write_str(&names.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_reason_platform_codes() {
        assert_eq!(
            UnavailableReason::NoneEnrolled.platform_code(),
            "BIOMETRIC_ERROR_NONE_ENROLLED"
        );
        assert_eq!(
            UnavailableReason::NoHardware.platform_code(),
            "BIOMETRIC_ERROR_NO_HARDWARE"
        );
    }

    #[test]
    fn authenticator_mask_union_and_contains() {
        let combined =
            Authenticators::BIOMETRIC_STRONG.union(Authenticators::DEVICE_CREDENTIAL);
        assert!(combined.contains(Authenticators::BIOMETRIC_STRONG));
        assert!(combined.contains(Authenticators::DEVICE_CREDENTIAL));
        assert!(!Authenticators::BIOMETRIC_STRONG.contains(Authenticators::DEVICE_CREDENTIAL));
        assert_eq!(combined.bits(), 0x800F);
    }

    #[test]
    fn authenticator_mask_display_names() {
        let combined =
            Authenticators::BIOMETRIC_STRONG.union(Authenticators::DEVICE_CREDENTIAL);
        assert_eq!(combined.to_string(), "BIOMETRIC_STRONG|DEVICE_CREDENTIAL");
        assert_eq!(
            Authenticators::BIOMETRIC_STRONG.to_string(),
            "BIOMETRIC_STRONG"
        );
    }

    #[test]
    fn digest_ordering_tracks_strength() {
        assert!(Digest::Sha256 < Digest::Sha512);
        assert!(Digest::Sha256.strength_bits() < Digest::Sha512.strength_bits());
    }
}
