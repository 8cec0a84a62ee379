//! Validation result cache operations.
//!
//! Implements [`ResultCache`] on top of the `validation_cache` table.

use super::connection::CacheDb;
use crate::Error;
use crate::model::ValidationResult;
use crate::store::ResultCache;
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use tokio_rusqlite::params;

#[async_trait]
impl ResultCache for CacheDb {
    async fn get_cached(&self, key: &str) -> Result<Option<ValidationResult>, Error> {
        let key = key.to_string();
        let now = Utc::now().to_rfc3339();
        let json = self
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt =
                    conn.prepare("SELECT result_json FROM validation_cache WHERE key_hash = ?1 AND expires_at > ?2")?;

                let result = stmt.query_row(params![key, now], |row| row.get(0));

                match result {
                    Ok(json) => Ok(Some(json)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Uses UPSERT semantics: a fresh write replaces the previous entry and its expiry.
    async fn put_cached(&self, key: &str, result: &ValidationResult, ttl_seconds: i64) -> Result<(), Error> {
        let key = key.to_string();
        let email = result.email.clone();
        let depth = result.depth.clone();
        let result_json = serde_json::to_string(result)?;

        let now = Utc::now();
        let expires_at = TimeDelta::try_seconds(ttl_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| Error::InvalidInput(format!("cache TTL out of range: {ttl_seconds}s")))?
            .to_rfc3339();
        let fetched_at = now.to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO validation_cache (key_hash, email, depth, result_json, fetched_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        email = excluded.email,
                        depth = excluded.depth,
                        result_json = excluded.result_json,
                        fetched_at = excluded.fetched_at,
                        expires_at = excluded.expires_at",
                    params![key, email, depth, result_json, fetched_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

impl CacheDb {
    /// Delete expired validation cache entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_validations(&self) -> Result<u64, Error> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM validation_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every validation cache entry.
    pub async fn purge_all_validations(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM validation_cache", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of rows in the cache, expired ones included.
    pub async fn count_cached_validations(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM validation_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
