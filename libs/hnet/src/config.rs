//! Network configuration.
//!
//! ```toml
//! divider = "/"
//! escape = "\\"
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error loading a [`NetworkConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML source could not be parsed.
    #[error("failed to parse network config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The divider and escape characters are the same.
    #[error("path divider and escape must differ (both are `{0}`)")]
    DividerIsEscape(char),
}

/// Hierarchical path syntax used by a network.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Separates instance names in a hierarchical path.
    pub divider: char,
    /// Makes the following divider part of a name.
    pub escape: char,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            divider: '/',
            escape: '\\',
        }
    }
}

impl NetworkConfig {
    /// Parses and validates a configuration from TOML source.
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.divider == self.escape {
            return Err(ConfigError::DividerIsEscape(self.divider));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn missing_keys_use_defaults() {
        let config = NetworkConfig::from_toml_str("divider = \".\"").unwrap();
        assert_eq!(config.divider, '.');
        assert_eq!(config.escape, '\\');
        assert_eq!(NetworkConfig::from_toml_str("").unwrap(), NetworkConfig::default());
    }

    #[test]
    fn divider_must_differ_from_escape() {
        let err = NetworkConfig::from_toml_str("divider = \"|\"\nescape = \"|\"").unwrap_err();
        assert!(matches!(err, ConfigError::DividerIsEscape('|')));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(matches!(
            NetworkConfig::from_toml_str("divider = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
