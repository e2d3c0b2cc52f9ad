//! Property-based tests for the version-gated policy.
//!
//! These verify the monotonicity of the generation table and the
//! authenticator-mask selection rules across arbitrary API levels.

use proptest::prelude::*;

use biosign_core::policy::{
    allowed_authenticators, generation_policy, signature_algorithm, DEVICE_CREDENTIAL_MIN_API,
    MIN_API_LEVEL,
};
use biosign_core::Authenticators;

/// Strategy for API levels at or above the floor.
fn supported_api_level() -> impl Strategy<Value = u32> {
    MIN_API_LEVEL..=50u32
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    // ========================================================================
    // Generation Policy Properties
    // ========================================================================

    /// Below the floor there is never a policy, an algorithm, or a key spec.
    #[test]
    fn below_floor_selects_nothing(api in 0..MIN_API_LEVEL) {
        prop_assert!(generation_policy(api).is_none());
        prop_assert!(signature_algorithm(api).is_none());
    }

    /// At or above the floor a policy always exists.
    #[test]
    fn at_or_above_floor_always_selects(api in supported_api_level()) {
        prop_assert!(generation_policy(api).is_some());
        prop_assert!(signature_algorithm(api).is_some());
    }

    /// Strength never decreases as the API level increases.
    #[test]
    fn policy_strength_is_monotonic(
        (low, high) in supported_api_level()
            .prop_flat_map(|low| (Just(low), low..=50u32))
    ) {
        let older = generation_policy(low).unwrap();
        let newer = generation_policy(high).unwrap();

        prop_assert!(newer.digest >= older.digest);
        prop_assert!(newer.key_size_bits >= older.key_size_bits);
    }

    /// The signing algorithm digest always matches the generation digest.
    #[test]
    fn signing_digest_matches_generation_digest(api in supported_api_level()) {
        let policy = generation_policy(api).unwrap();
        let algorithm = signature_algorithm(api).unwrap();
        prop_assert_eq!(algorithm.digest(), policy.digest);
    }

    /// Generated key specs always demand fresh per-use authentication.
    #[test]
    fn key_spec_requires_fresh_auth(api in supported_api_level()) {
        let spec = generation_policy(api).unwrap().key_spec();
        prop_assert!(spec.user_authentication_required);
        prop_assert!(spec.fresh_authentication_per_use);
    }

    // ========================================================================
    // Authenticator Mask Properties
    // ========================================================================

    /// Strong biometrics are always part of the mask.
    #[test]
    fn mask_always_includes_strong_biometrics(
        allow in any::<bool>(),
        api in 0..=50u32,
    ) {
        let mask = allowed_authenticators(allow, api);
        prop_assert!(mask.contains(Authenticators::BIOMETRIC_STRONG));
    }

    /// Device credential appears iff requested on an eligible version.
    #[test]
    fn credential_requires_request_and_eligibility(
        allow in any::<bool>(),
        api in 0..=50u32,
    ) {
        let mask = allowed_authenticators(allow, api);
        let expected = allow && api >= DEVICE_CREDENTIAL_MIN_API;
        prop_assert_eq!(
            mask.contains(Authenticators::DEVICE_CREDENTIAL),
            expected
        );
    }

    /// Without a fallback request the mask is exactly biometric-strong.
    #[test]
    fn no_request_means_biometric_only(api in 0..=50u32) {
        prop_assert_eq!(
            allowed_authenticators(false, api),
            Authenticators::BIOMETRIC_STRONG
        );
    }
}
