//! Version-gated policy for key generation and authenticator selection.
//!
//! Cryptographic capability differs across platform versions, so the
//! generation parameters, the signing algorithm, and the allowed
//! authenticator classes are all selected from the same API-level tiers.
//! The generation table is ordered by descending minimum version; the
//! first row at or below the queried level wins, so new tiers are appended
//! at the top without touching existing rows.

use crate::types::{Authenticators, Digest, KeySpec, SignatureAlgorithm, SignaturePadding};

/// Minimum platform API level for any biometric operation.
///
/// Below this floor every operation short-circuits without touching
/// hardware.
pub const MIN_API_LEVEL: u32 = 23;

/// Minimum API level at which device-credential fallback may be combined
/// with strong biometrics in a single challenge.
pub const DEVICE_CREDENTIAL_MIN_API: u32 = 30;

/// One row of the version-gated generation policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Minimum API level this row applies to.
    pub min_api: u32,
    /// Digest the key is generated for.
    pub digest: Digest,
    /// RSA modulus size in bits.
    pub key_size_bits: u32,
    /// Signature padding scheme.
    pub padding: SignaturePadding,
    /// Whether the store should additionally require user presence.
    pub user_presence_required: bool,
}

/// Ordered policy table, strongest tier first.
///
/// Invariant: strength (digest, key size) is non-decreasing as `min_api`
/// increases. Checked by property tests.
const GENERATION_POLICIES: &[GenerationPolicy] = &[
    GenerationPolicy {
        min_api: 28,
        digest: Digest::Sha512,
        key_size_bits: 4096,
        padding: SignaturePadding::Pkcs1,
        user_presence_required: true,
    },
    GenerationPolicy {
        min_api: 26,
        digest: Digest::Sha512,
        key_size_bits: 2048,
        padding: SignaturePadding::Pkcs1,
        user_presence_required: false,
    },
    GenerationPolicy {
        min_api: MIN_API_LEVEL,
        digest: Digest::Sha256,
        key_size_bits: 2048,
        padding: SignaturePadding::Pkcs1,
        user_presence_required: false,
    },
];

/// Select the generation policy for a platform API level.
///
/// Returns `None` below the minimum floor.
#[must_use]
pub fn generation_policy(api_level: u32) -> Option<&'static GenerationPolicy> {
    GENERATION_POLICIES
        .iter()
        .find(|policy| api_level >= policy.min_api)
}

impl GenerationPolicy {
    /// Key-store generation parameters for this tier.
    ///
    /// User authentication is always required and never cached; a fresh
    /// ceremony is needed for every key use.
    #[must_use]
    pub fn key_spec(&self) -> KeySpec {
        KeySpec {
            key_size_bits: self.key_size_bits,
            digest: self.digest,
            padding: self.padding,
            user_authentication_required: true,
            fresh_authentication_per_use: true,
            user_presence_required: self.user_presence_required,
        }
    }

    /// Signing algorithm matching this tier's generation digest.
    ///
    /// The store rejects a signing operation whose digest differs from the
    /// one the key was generated with, so this MUST stay derived from the
    /// same row.
    #[must_use]
    pub const fn signature_algorithm(&self) -> SignatureAlgorithm {
        match self.digest {
            Digest::Sha256 => SignatureAlgorithm::Sha256WithRsa,
            Digest::Sha512 => SignatureAlgorithm::Sha512WithRsa,
        }
    }
}

/// Signing algorithm for a platform API level, `None` below the floor.
#[must_use]
pub fn signature_algorithm(api_level: u32) -> Option<SignatureAlgorithm> {
    generation_policy(api_level).map(GenerationPolicy::signature_algorithm)
}

/// Compute the authenticator mask for a challenge.
///
/// Device-credential fallback is included only when the caller requested
/// it AND the platform supports combining it with strong biometrics.
/// The capability prober and the prompt builder both go through this
/// function so the two can never disagree.
#[must_use]
pub fn allowed_authenticators(allow_device_credentials: bool, api_level: u32) -> Authenticators {
    if allow_device_credentials && api_level >= DEVICE_CREDENTIAL_MIN_API {
        Authenticators::BIOMETRIC_STRONG.union(Authenticators::DEVICE_CREDENTIAL)
    } else {
        Authenticators::BIOMETRIC_STRONG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_floor_has_no_policy() {
        assert!(generation_policy(MIN_API_LEVEL - 1).is_none());
        assert!(generation_policy(0).is_none());
        assert!(signature_algorithm(22).is_none());
    }

    #[test]
    fn tier_boundaries() {
        let base = generation_policy(23).unwrap();
        assert_eq!(base.digest, Digest::Sha256);
        assert_eq!(base.key_size_bits, 2048);

        let mid = generation_policy(26).unwrap();
        assert_eq!(mid.digest, Digest::Sha512);
        assert_eq!(mid.key_size_bits, 2048);

        let top = generation_policy(28).unwrap();
        assert_eq!(top.digest, Digest::Sha512);
        assert_eq!(top.key_size_bits, 4096);
        assert!(top.user_presence_required);

        // Levels past the newest tier keep the newest parameters.
        assert_eq!(generation_policy(34), generation_policy(28));
    }

    #[test]
    fn signature_algorithm_matches_generation_digest() {
        for api in MIN_API_LEVEL..40 {
            let policy = generation_policy(api).unwrap();
            assert_eq!(
                signature_algorithm(api).unwrap().digest(),
                policy.digest,
                "digest mismatch at API {api}"
            );
        }
    }

    #[test]
    fn credential_fallback_requires_request_and_eligibility() {
        let combined =
            Authenticators::BIOMETRIC_STRONG.union(Authenticators::DEVICE_CREDENTIAL);

        assert_eq!(allowed_authenticators(true, 30), combined);
        assert_eq!(allowed_authenticators(true, 33), combined);
        assert_eq!(
            allowed_authenticators(true, 29),
            Authenticators::BIOMETRIC_STRONG
        );
        assert_eq!(
            allowed_authenticators(false, 33),
            Authenticators::BIOMETRIC_STRONG
        );
    }

    #[test]
    fn key_spec_always_requires_fresh_auth() {
        for api in [23, 26, 28, 31] {
            let spec = generation_policy(api).unwrap().key_spec();
            assert!(spec.user_authentication_required);
            assert!(spec.fresh_authentication_per_use);
        }
    }
}
