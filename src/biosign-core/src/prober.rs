//! Capability prober: biometric availability and enrollment queries.

use std::sync::Arc;

use tracing::debug;

use crate::platform::{BiometricService, PlatformInfo};
use crate::policy::{self, MIN_API_LEVEL};
use crate::types::{AvailabilityResult, CanAuthenticate, UnavailableReason};

/// Read-only prober for biometric hardware availability.
///
/// Shares the authenticator-mask policy with the prompt builder so an
/// availability answer always matches what a subsequent challenge would
/// request.
pub struct CapabilityProber {
    platform: Arc<dyn PlatformInfo>,
    biometrics: Arc<dyn BiometricService>,
}

impl CapabilityProber {
    /// Create a prober over the given collaborators.
    #[must_use]
    pub fn new(platform: Arc<dyn PlatformInfo>, biometrics: Arc<dyn BiometricService>) -> Self {
        Self {
            platform,
            biometrics,
        }
    }

    /// Check whether a biometric authenticator is usable for the requested
    /// capability tier.
    ///
    /// Below the platform floor this returns
    /// [`UnavailableReason::UnsupportedPlatformVersion`] without querying
    /// hardware. No side effects; safe to call repeatedly.
    #[must_use]
    pub fn check_availability(&self, allow_device_credentials: bool) -> AvailabilityResult {
        let api_level = self.platform.api_level();
        if api_level < MIN_API_LEVEL {
            debug!(api_level, "availability: platform below minimum floor");
            return AvailabilityResult::Unavailable {
                reason: UnavailableReason::UnsupportedPlatformVersion,
            };
        }

        let authenticators = policy::allowed_authenticators(allow_device_credentials, api_level);
        debug!(%authenticators, "availability: querying authenticators");

        let status = self.biometrics.can_authenticate(authenticators);
        debug!(?status, "availability: platform result");

        match status {
            CanAuthenticate::Success => AvailabilityResult::Available {
                biometry_type: self.biometrics.biometry_type(),
            },
            CanAuthenticate::NoHardware => AvailabilityResult::Unavailable {
                reason: UnavailableReason::NoHardware,
            },
            CanAuthenticate::HardwareUnavailable => AvailabilityResult::Unavailable {
                reason: UnavailableReason::HardwareUnavailable,
            },
            CanAuthenticate::NoneEnrolled => AvailabilityResult::Unavailable {
                reason: UnavailableReason::NoneEnrolled,
            },
            CanAuthenticate::SecurityUpdateRequired => AvailabilityResult::Unavailable {
                reason: UnavailableReason::SecurityUpdateRequired,
            },
        }
    }
}
