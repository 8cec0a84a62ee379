//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MAILODDS_*)
//! 2. TOML config file (if MAILODDS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Depth, Threshold};

mod validation;

pub use validation::ConfigError;

/// Key prefix that marks a test-mode credential.
pub const TEST_KEY_PREFIX: &str = "mo_test_";

/// Form integrations that can be toggled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormIntegration {
    WpRegistration,
    Woocommerce,
    Wpforms,
    GravityForms,
    Cf7,
}

impl FormIntegration {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormIntegration::WpRegistration => "wp_registration",
            FormIntegration::Woocommerce => "woocommerce",
            FormIntegration::Wpforms => "wpforms",
            FormIntegration::GravityForms => "gravity_forms",
            FormIntegration::Cf7 => "cf7",
        }
    }
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MAILODDS_*)
/// 2. TOML config file (if MAILODDS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// MailOdds API key. A `mo_test_` prefix selects test mode.
    ///
    /// Set via MAILODDS_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the validation service.
    ///
    /// Set via MAILODDS_API_BASE environment variable.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Path to the SQLite database holding cache, options, and identities.
    ///
    /// Set via MAILODDS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for API requests.
    ///
    /// Set via MAILODDS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via MAILODDS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Lifetime of cached validation results in seconds.
    ///
    /// Set via MAILODDS_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,

    /// Default validation depth.
    ///
    /// Set via MAILODDS_DEPTH environment variable.
    #[serde(default)]
    pub depth: Depth,

    /// Policy applied by the remote service. 0 means no policy.
    ///
    /// Set via MAILODDS_POLICY_ID environment variable.
    #[serde(default)]
    pub policy_id: u32,

    /// Whether risky addresses block submissions.
    ///
    /// Set via MAILODDS_ACTION_THRESHOLD environment variable.
    #[serde(default)]
    pub action_threshold: Threshold,

    /// Enabled form integrations.
    ///
    /// Set via MAILODDS_INTEGRATIONS environment variable (e.g. `[wpforms, cf7]`).
    #[serde(default)]
    pub integrations: Vec<FormIntegration>,

    /// Whether the scheduled validation job runs.
    ///
    /// Set via MAILODDS_CRON_ENABLED environment variable.
    #[serde(default)]
    pub cron_enabled: bool,

    /// Interval between scheduled validation runs in seconds.
    ///
    /// Set via MAILODDS_CRON_INTERVAL_SECS environment variable.
    #[serde(default = "default_cron_interval_secs")]
    pub cron_interval_secs: u64,

    /// Identities per page for bulk and scheduled validation.
    ///
    /// Set via MAILODDS_BULK_BATCH_SIZE environment variable.
    #[serde(default = "default_bulk_batch_size")]
    pub bulk_batch_size: usize,
}

fn default_api_base() -> String {
    "https://api.mailodds.com".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./mailodds.sqlite")
}

fn default_user_agent() -> String {
    concat!("mailodds-rs/", env!("CARGO_PKG_VERSION")).into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_cache_ttl_secs() -> i64 {
    86_400 // 24h
}

fn default_cron_interval_secs() -> u64 {
    604_800 // weekly
}

fn default_bulk_batch_size() -> usize {
    50
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            depth: Depth::default(),
            policy_id: 0,
            action_threshold: Threshold::default(),
            integrations: Vec::new(),
            cron_enabled: false,
            cron_interval_secs: default_cron_interval_secs(),
            bulk_batch_size: default_bulk_batch_size(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Scheduled job interval as Duration.
    pub fn cron_interval(&self) -> Duration {
        Duration::from_secs(self.cron_interval_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MAILODDS_`
    /// 2. TOML file from `MAILODDS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered figment used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MAILODDS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("MAILODDS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate a configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let mut config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        if config.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            config.api_key = None;
        }

        config.validate()?;

        Ok(config)
    }

    /// Check if an API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the API key is not set or empty.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "api_key".into(),
            hint: "Set MAILODDS_API_KEY environment variable".into(),
        })
    }

    /// Whether a non-empty key is configured.
    pub fn has_api_key(&self) -> bool {
        self.require_api_key().is_ok()
    }

    /// Whether the configured key is a test-mode key.
    pub fn is_test_mode(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| k.starts_with(TEST_KEY_PREFIX))
    }

    pub fn integration_enabled(&self, integration: FormIntegration) -> bool {
        self.integrations.contains(&integration)
    }
}
