//! Named option storage.
//!
//! Implements [`OptionStore`] on top of the `options` table. Values are stored as JSON.

use super::connection::CacheDb;
use crate::Error;
use crate::store::OptionStore;
use async_trait::async_trait;
use chrono::Utc;
use tokio_rusqlite::params;

#[async_trait]
impl OptionStore for CacheDb {
    async fn get_option(&self, name: &str) -> Result<Option<serde_json::Value>, Error> {
        let name = name.to_string();
        let json = self
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result =
                    conn.query_row("SELECT value_json FROM options WHERE name = ?1", params![name], |row| row.get(0));

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

    async fn set_option(&self, name: &str, value: &serde_json::Value) -> Result<(), Error> {
        let name = name.to_string();
        let value_json = value.to_string();
        let updated_at = Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO options (name, value_json, updated_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(name) DO UPDATE SET
                        value_json = excluded.value_json,
                        updated_at = excluded.updated_at",
                    params![name, value_json, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_option(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM options WHERE name = ?1", params![name])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }
}
