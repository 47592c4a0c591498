//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_name` is empty
    /// - `base_url` is not an absolute http(s) URL
    /// - `static_assets` is empty or holds an empty path
    /// - `external_origins` holds an empty substring
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_name.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "cache_name".into(), reason: "must not be empty".into() });
        }

        self.base()?;

        if self.static_assets.is_empty() {
            return Err(ConfigError::Invalid {
                field: "static_assets".into(),
                reason: "must list at least the entry document".into(),
            });
        }
        if self.static_assets.iter().any(|a| a.trim().is_empty()) {
            return Err(ConfigError::Invalid { field: "static_assets".into(), reason: "contains an empty path".into() });
        }

        // An empty substring would match every origin and disable caching.
        if self.external_origins.iter().any(|o| o.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "external_origins".into(),
                reason: "contains an empty host substring".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if let Ok(base) = self.base()
            && let Some(host) = base.host_str()
            && self.external_origins.iter().any(|o| base.origin().ascii_serialization().contains(o.as_str()))
        {
            tracing::warn!(
                host,
                "base_url matches an external origin; same-origin assets will never be cached"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_cache_name() {
        let config = AppConfig { cache_name: "  ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_name"));
    }

    #[test]
    fn test_validate_bad_base_url() {
        let config = AppConfig { base_url: "not a url".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "base_url"));
    }

    #[test]
    fn test_validate_no_static_assets() {
        let config = AppConfig { static_assets: Vec::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "static_assets"));
    }

    #[test]
    fn test_validate_empty_external_origin() {
        let config = AppConfig { external_origins: vec!["imgly.io".into(), String::new()], ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "external_origins"));
    }

    #[test]
    fn test_validate_no_external_origins_is_fine() {
        let config = AppConfig { external_origins: Vec::new(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let config = AppConfig { timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }
}
