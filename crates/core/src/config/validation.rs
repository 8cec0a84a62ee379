//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Longest accepted cache TTL: one year.
pub const MAX_CACHE_TTL_SECS: i64 = 365 * 24 * 3600;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `cache_ttl_secs` is not positive or exceeds one year
    /// - `bulk_batch_size` is 0 or exceeds 1000
    /// - `cron_interval_secs` is under a minute
    /// - `api_base` is not an http(s) URL
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.cache_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: format!("must not exceed one year ({MAX_CACHE_TTL_SECS}s)"),
            });
        }

        if self.bulk_batch_size == 0 || self.bulk_batch_size > 1000 {
            return Err(ConfigError::Invalid {
                field: "bulk_batch_size".into(),
                reason: "must be between 1 and 1000".into(),
            });
        }

        if self.cron_interval_secs < 60 {
            return Err(ConfigError::Invalid {
                field: "cron_interval_secs".into(),
                reason: "must be at least 60 seconds".into(),
            });
        }

        if !(self.api_base.starts_with("https://") || self.api_base.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                field: "api_base".into(),
                reason: "must be an http:// or https:// URL".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.cron_enabled && !self.has_api_key() {
            tracing::warn!("cron_enabled is set but no api_key is configured; scheduled runs will be skipped");
        }

        Ok(())
    }
}
