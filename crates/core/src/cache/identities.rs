//! Identity directory operations.
//!
//! Implements [`Directory`] on top of the `identities` table. An identity is
//! "validated" once it carries a status marker, whatever that status is.

use super::connection::CacheDb;
use crate::Error;
use crate::model::{Identity, ValidationMarker};
use crate::store::Directory;
use async_trait::async_trait;
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Full identity row, markers included.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdentityRecord {
    pub id: i64,
    pub email: String,
    pub registered_at: String,
    pub status: Option<String>,
    pub action: Option<String>,
    pub validated_at: Option<String>,
}

#[async_trait]
impl Directory for CacheDb {
    async fn list_unvalidated(&self, limit: usize) -> Result<Vec<Identity>, Error> {
        let limit = limit as i64;
        self.conn
            .call(move |conn| -> Result<Vec<Identity>, Error> {
                let mut stmt = conn.prepare("SELECT id, email FROM identities WHERE status IS NULL ORDER BY id LIMIT ?1")?;
                let rows = stmt.query_map(params![limit], |row| Ok(Identity { id: row.get(0)?, email: row.get(1)? }))?;
                let identities = rows.collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(identities)
            })
            .await
            .map_err(Error::from)
    }

    async fn write_result(&self, id: i64, marker: &ValidationMarker) -> Result<(), Error> {
        let status = marker.status.clone();
        let action = marker.action.clone();
        let validated_at = marker.validated_at.to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let updated = conn.execute(
                    "UPDATE identities SET status = ?2, action = ?3, validated_at = ?4 WHERE id = ?1",
                    params![id, status, action, validated_at],
                )?;
                if updated == 0 {
                    return Err(Error::NotFound(format!("identity {id}")));
                }
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

impl CacheDb {
    /// Add an identity to the directory, returning its id.
    pub async fn insert_identity(&self, email: &str) -> Result<i64, Error> {
        let email = email.to_string();
        let registered_at = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<i64, Error> {
                conn.execute(
                    "INSERT INTO identities (email, registered_at) VALUES (?1, ?2)",
                    params![email, registered_at],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a single identity row by id.
    pub async fn get_identity(&self, id: i64) -> Result<Option<IdentityRecord>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<IdentityRecord>, Error> {
                let result = conn.query_row(
                    "SELECT id, email, registered_at, status, action, validated_at FROM identities WHERE id = ?1",
                    params![id],
                    row_to_record,
                );

                match result {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Most recently validated identities, newest first.
    pub async fn recent_validated(&self, limit: usize) -> Result<Vec<IdentityRecord>, Error> {
        let limit = limit as i64;
        self.conn
            .call(move |conn| -> Result<Vec<IdentityRecord>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, email, registered_at, status, action, validated_at FROM identities
                    WHERE status IS NOT NULL ORDER BY validated_at DESC, id DESC LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![limit], row_to_record)?;
                let records = rows.collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(records)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of identities carrying a validation marker.
    pub async fn count_validated(&self) -> Result<u64, Error> {
        self.count_where("status IS NOT NULL").await
    }

    /// Number of identities without a validation marker.
    pub async fn count_unvalidated(&self) -> Result<u64, Error> {
        self.count_where("status IS NULL").await
    }

    async fn count_where(&self, predicate: &'static str) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 =
                    conn.query_row(&format!("SELECT COUNT(*) FROM identities WHERE {predicate}"), [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<IdentityRecord> {
    Ok(IdentityRecord {
        id: row.get(0)?,
        email: row.get(1)?,
        registered_at: row.get(2)?,
        status: row.get(3)?,
        action: row.get(4)?,
        validated_at: row.get(5)?,
    })
}
