//! Module configuration.

/// Configuration for a biometric signing module instance.
///
/// The key alias is explicit so independent instances (and tests) can
/// coexist without sharing a key record.
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    /// Alias of the single key record this instance manages.
    pub key_alias: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            key_alias: "biometric_key".into(),
        }
    }
}

impl ModuleConfig {
    /// Create a configuration with a custom key alias.
    #[must_use]
    pub fn with_alias(key_alias: impl Into<String>) -> Self {
        Self {
            key_alias: key_alias.into(),
        }
    }
}
