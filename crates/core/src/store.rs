//! Collaborator traits consumed by the validation client and the batch runner.
//!
//! The SQLite-backed [`CacheDb`](crate::CacheDb) implements all three; tests and
//! embedders can provide their own.

use async_trait::async_trait;

use crate::Error;
use crate::model::{Identity, ValidationMarker, ValidationResult};

/// Key/value store with TTL for validation results.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Look up a cached result. Expired entries are a miss.
    async fn get_cached(&self, key: &str) -> Result<Option<ValidationResult>, Error>;

    /// Store a result under `key` for `ttl_seconds`.
    async fn put_cached(&self, key: &str, result: &ValidationResult, ttl_seconds: i64) -> Result<(), Error>;
}

/// Generic named-value store (settings, daily stats, job bookkeeping).
#[async_trait]
pub trait OptionStore: Send + Sync {
    async fn get_option(&self, name: &str) -> Result<Option<serde_json::Value>, Error>;

    async fn set_option(&self, name: &str, value: &serde_json::Value) -> Result<(), Error>;

    /// Returns whether the option existed.
    async fn delete_option(&self, name: &str) -> Result<bool, Error>;
}

/// Identity directory the batch runner pages through.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Up to `limit` identities that carry no validation marker yet.
    async fn list_unvalidated(&self, limit: usize) -> Result<Vec<Identity>, Error>;

    /// Attach a validation marker to an identity.
    async fn write_result(&self, id: i64, marker: &ValidationMarker) -> Result<(), Error>;
}
