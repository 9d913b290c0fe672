//! Connection configuration.

use serde::Deserialize;

use crate::error::Result;

/// Dialect-related connection settings.
///
/// ```rust
/// use oxide_sql_firebird::FirebirdConfig;
///
/// let config = FirebirdConfig::from_json(r#"{ "version": "3", "prefix": "app_" }"#).unwrap();
/// assert_eq!(config.version.as_deref(), Some("3"));
/// assert_eq!(config.prefix, "app_");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FirebirdConfig {
    /// Dialect version to compile for (`"2"`, `"2.5"`, `"3.0"`, ...).
    ///
    /// Absent means "detect, or use the newest supported version"; a present
    /// value must name a supported version.
    pub version: Option<String>,
    /// Literal engine version string used instead of querying the engine.
    pub engine_version: Option<String>,
    /// Prefix applied to every table name.
    pub prefix: String,
    /// Emit identifiers double-quoted (case-sensitive in Firebird).
    pub quote_identifiers: bool,
}

impl FirebirdConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) on malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the dialect version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the literal engine version.
    #[must_use]
    pub fn with_engine_version(mut self, version: impl Into<String>) -> Self {
        self.engine_version = Some(version.into());
        self
    }

    /// Sets the table prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = FirebirdConfig::from_json("{}").unwrap();
        assert_eq!(config, FirebirdConfig::default());
        assert!(config.version.is_none());
    }

    #[test]
    fn test_null_version_counts_as_absent() {
        let config = FirebirdConfig::from_json(r#"{ "version": null }"#).unwrap();
        assert!(config.version.is_none());
    }

    #[test]
    fn test_malformed_config() {
        assert!(FirebirdConfig::from_json(r#"{ "version": 3 }"#).is_err());
    }
}
