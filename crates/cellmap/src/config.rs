//! Registry configuration.
//!
//! Configuration is plain TOML:
//!
//! ```toml
//! ambiguity = "last-match"
//! warn_on_ambiguity = true
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the registry picks a mapping when several candidates match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
    /// The first registered candidate wins.
    #[default]
    FirstMatch,
    /// The last registered candidate wins.
    LastMatch,
    /// More than one candidate is an error.
    Strict,
}

/// Settings for a [`MappingRegistry`](crate::MappingRegistry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Tie-break rule for multiple candidates.
    pub ambiguity: AmbiguityPolicy,
    /// Log ambiguous resolutions at `warn` instead of `debug`.
    pub warn_on_ambiguity: bool,
}

impl RegistryConfig {
    /// Sets the ambiguity policy.
    pub fn with_ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self {
        self.ambiguity = ambiguity;
        self
    }

    /// Sets whether ambiguous resolutions log at `warn`.
    pub fn with_warn_on_ambiguity(mut self, warn: bool) -> Self {
        self.warn_on_ambiguity = warn;
        self
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::from_toml_str("").unwrap();
        assert_eq!(config, RegistryConfig::default());
        assert_eq!(config.ambiguity, AmbiguityPolicy::FirstMatch);
        assert!(!config.warn_on_ambiguity);
    }

    #[test]
    fn test_parse() {
        let config = RegistryConfig::from_toml_str(
            r#"
            ambiguity = "strict"
            warn_on_ambiguity = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            RegistryConfig::default()
                .with_ambiguity(AmbiguityPolicy::Strict)
                .with_warn_on_ambiguity(true)
        );
    }

    #[test]
    fn test_rejects_unknown_keys_and_values() {
        assert!(matches!(
            RegistryConfig::from_toml_str("ambiguity = \"random\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            RegistryConfig::from_toml_str("cache_size = 3"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RegistryConfig::load("/nonexistent/cellmap.toml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
