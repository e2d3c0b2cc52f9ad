//! Construction of the authentication challenge descriptor.

use serde::{Deserialize, Serialize};

use crate::policy;
use crate::types::Authenticators;

/// Everything the platform prompt needs to present a challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeDescriptor {
    /// Title shown on the authentication dialog.
    pub title: String,
    /// Text for the negative/cancel button, when one may be shown.
    ///
    /// `None` when device-credential fallback is active: the platform
    /// forbids a negative button in that configuration and fails descriptor
    /// construction if one is supplied.
    pub negative_button_text: Option<String>,
    /// Authenticator classes allowed for this challenge.
    pub allowed_authenticators: Authenticators,
}

/// Build the challenge descriptor for a prompt.
///
/// The authenticator mask comes from the shared version policy. The
/// negative button is attached only when device-credential fallback is not
/// both requested and eligible; this reproduces a platform UI constraint,
/// not a business rule.
#[must_use]
pub fn build_challenge_descriptor(
    title: impl Into<String>,
    cancel_button_text: impl Into<String>,
    allow_device_credentials: bool,
    api_level: u32,
) -> ChallengeDescriptor {
    let allowed = policy::allowed_authenticators(allow_device_credentials, api_level);
    let fallback_active = allowed.contains(Authenticators::DEVICE_CREDENTIAL);

    ChallengeDescriptor {
        title: title.into(),
        negative_button_text: if fallback_active {
            None
        } else {
            Some(cancel_button_text.into())
        },
        allowed_authenticators: allowed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_button_present_without_fallback() {
        let descriptor = build_challenge_descriptor("Sign in", "Cancel", false, 33);
        assert_eq!(descriptor.negative_button_text.as_deref(), Some("Cancel"));
        assert_eq!(
            descriptor.allowed_authenticators,
            Authenticators::BIOMETRIC_STRONG
        );
    }

    #[test]
    fn negative_button_suppressed_when_fallback_active() {
        let descriptor = build_challenge_descriptor("Sign in", "Cancel", true, 33);
        assert!(descriptor.negative_button_text.is_none());
        assert!(descriptor
            .allowed_authenticators
            .contains(Authenticators::DEVICE_CREDENTIAL));
    }

    #[test]
    fn old_platform_keeps_negative_button_despite_fallback_request() {
        // Fallback requested but ineligible below API 30: biometric-only
        // mask, so the cancel affordance must still be present.
        let descriptor = build_challenge_descriptor("Sign in", "Abbrechen", true, 28);
        assert_eq!(
            descriptor.negative_button_text.as_deref(),
            Some("Abbrechen")
        );
        assert_eq!(
            descriptor.allowed_authenticators,
            Authenticators::BIOMETRIC_STRONG
        );
    }
}
