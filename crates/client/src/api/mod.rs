//! MailOdds validation API client.
//!
//! Wraps `POST /v1/validate` and `POST /v1/validate/batch` with a result cache
//! and daily statistics.
//!
//! ### Behaviour
//!
//! - **Authentication**: bearer token from `MAILODDS_API_KEY`.
//! - **Sanitization**: addresses are sanitized before any cache or network access.
//! - **Cache**: single validations read and write the cache, keyed by
//!   [`cache_key`]. Batch validations only write it.
//! - **Stats**: every live result is counted into today's [`DailyStats`](mailodds_core::DailyStats).
//!   Cache hits are not counted.
//! - **Failures**: cache and stats writes are best effort. No request is retried.

pub mod error;
pub mod request;
pub mod response;
pub mod transport;

pub use error::ClientError;
pub use request::{ValidateOptions, sanitize_batch, sanitize_email};
pub use response::{BatchResponse, ErrorBody};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

use std::sync::Arc;
use std::time::{Duration, Instant};

use mailodds_core::config::TEST_KEY_PREFIX;
use mailodds_core::{AppConfig, CacheDb, Depth, ResultCache, StatsStore, ValidationResult, cache_key};
use request::{BatchBody, ValidateBody};

/// Default base URL for the MailOdds API.
const DEFAULT_BASE_URL: &str = "https://api.mailodds.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cache TTL: 24 hours.
const DEFAULT_CACHE_TTL_SECS: i64 = 86_400;

const VALIDATE_PATH: &str = "/v1/validate";
const BATCH_PATH: &str = "/v1/validate/batch";

/// Validation client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key. Empty means no key is configured.
    pub api_key: String,
    /// Base URL (default: https://api.mailodds.com).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    pub user_agent: String,
    /// Depth used when a call does not override it.
    pub depth: Depth,
    /// Policy used when a call does not override it. 0 means none.
    pub policy_id: u32,
    /// Cache TTL in seconds (default: 24h).
    pub cache_ttl_secs: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("mailodds-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            depth: Depth::default(),
            policy_id: 0,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl From<&AppConfig> for ClientConfig {
    fn from(app: &AppConfig) -> Self {
        Self {
            api_key: app.api_key.clone().unwrap_or_default(),
            base_url: app.api_base.clone(),
            timeout: app.timeout(),
            user_agent: app.user_agent.clone(),
            depth: app.depth,
            policy_id: app.policy_id,
            cache_ttl_secs: app.cache_ttl_secs,
        }
    }
}

/// Caching, stats-recording validation client.
#[derive(Clone)]
pub struct ValidationClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn ResultCache>,
    stats: StatsStore,
}

impl std::fmt::Debug for ValidationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationClient")
            .field("base_url", &self.config.base_url)
            .field("depth", &self.config.depth)
            .field("has_key", &self.has_key())
            .finish_non_exhaustive()
    }
}

impl ValidationClient {
    /// Create a client from explicit collaborators.
    ///
    /// A missing key is not an error here; validations report it per call.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, cache: Arc<dyn ResultCache>, stats: StatsStore) -> Self {
        Self { config, transport, cache, stats }
    }

    /// Create a client over HTTP, using `db` for both the cache and the stats.
    pub fn from_app_config(app: &AppConfig, db: CacheDb) -> Result<Self, ClientError> {
        let config = ClientConfig::from(app);
        let transport = HttpTransport::new(&config.base_url, config.timeout, &config.user_agent)?;
        let db = Arc::new(db);
        Ok(Self::new(config, Arc::new(transport), db.clone(), StatsStore::new(db)))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }

    pub fn has_key(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Whether the configured key is a test key (`mo_test_` prefix).
    pub fn is_test_mode(&self) -> bool {
        self.config.api_key.starts_with(TEST_KEY_PREFIX)
    }

    pub fn cache_key(email: &str, depth: Depth) -> String {
        cache_key(email, depth)
    }

    /// Validate one address.
    ///
    /// Returns the cached result (with `cached` set) when one exists, unless
    /// `opts.skip_cache`.
    pub async fn validate(&self, email: &str, opts: ValidateOptions) -> Result<ValidationResult, ClientError> {
        let email = sanitize_email(email).ok_or_else(|| ClientError::InvalidEmail(email.to_string()))?;
        if !self.has_key() {
            return Err(ClientError::MissingApiKey);
        }

        let depth = opts.depth.unwrap_or(self.config.depth);
        let policy_id = opts.policy_id.unwrap_or(self.config.policy_id);
        let key = cache_key(&email, depth);

        if !opts.skip_cache {
            match self.cache.get_cached(&key).await {
                Ok(Some(mut hit)) => {
                    tracing::debug!("cache hit for {}", key);
                    hit.cached = true;
                    return Ok(hit);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("cache read failed for {}: {}", key, e),
            }
        }

        let body = serde_json::to_value(ValidateBody::new(&email, depth, policy_id))
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        let start = Instant::now();
        let response = self.post_json(VALIDATE_PATH, body).await?;
        let result: ValidationResult =
            serde_json::from_slice(&response.body).map_err(|e| ClientError::Parse(e.to_string()))?;

        tracing::debug!("validated in {:?}: status={} action={}", start.elapsed(), result.status, result.action);

        if !opts.skip_cache {
            self.store(&key, &result).await;
        }
        self.record(&result).await;

        Ok(result)
    }

    /// Validate several addresses in one request.
    ///
    /// Input is sanitized and deduplicated first. The cache is never read;
    /// every returned result is written to it and counted in the stats.
    /// Items the service returns in an unreadable shape are skipped.
    pub async fn validate_batch<I, S>(&self, emails: I, opts: ValidateOptions) -> Result<Vec<ValidationResult>, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.has_key() {
            return Err(ClientError::MissingApiKey);
        }

        let emails = sanitize_batch(emails);
        if emails.is_empty() {
            return Err(ClientError::NoEmails);
        }

        let depth = opts.depth.unwrap_or(self.config.depth);
        let policy_id = opts.policy_id.unwrap_or(self.config.policy_id);
        let body = serde_json::to_value(BatchBody::new(&emails, depth, policy_id))
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        tracing::debug!("validating batch of {}", emails.len());
        let response = self.post_json(BATCH_PATH, body).await?;
        let batch: BatchResponse =
            serde_json::from_slice(&response.body).map_err(|e| ClientError::Parse(e.to_string()))?;

        let mut results = Vec::with_capacity(batch.results.len());
        for item in batch.results {
            match serde_json::from_value::<ValidationResult>(item) {
                Ok(result) => results.push(result),
                Err(e) => tracing::warn!("skipping malformed batch item: {}", e),
            }
        }

        for result in &results {
            self.store(&cache_key(&result.email, depth), result).await;
            self.record(result).await;
        }

        Ok(results)
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<ApiResponse, ClientError> {
        let request = ApiRequest { path: path.to_string(), bearer: self.config.api_key.clone(), body };
        let response = self.transport.post(&request).await?;

        if !response.is_success() {
            let message = ErrorBody::message_from(&response.body);
            tracing::debug!("API error {}: {}", response.status, message);
            return Err(ClientError::Api { status: response.status, message });
        }

        Ok(response)
    }

    async fn store(&self, key: &str, result: &ValidationResult) {
        if let Err(e) = self.cache.put_cached(key, result, self.config.cache_ttl_secs).await {
            tracing::warn!("cache write failed for {}: {}", key, e);
        }
    }

    async fn record(&self, result: &ValidationResult) {
        if let Err(e) = self.stats.record(result.status).await {
            tracing::warn!("stats write failed: {}", e);
        }
    }
}
