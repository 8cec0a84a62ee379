//! uninstall tool implementation.
//!
//! Removes cached results, stored options, and identity markers. Identities
//! themselves are kept.

use mailodds_core::{CacheDb, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for uninstall tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UninstallParams {
    /// Must be true; nothing is removed otherwise.
    #[serde(default)]
    pub confirm: bool,
}

/// Output structure for uninstall tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UninstallOutput {
    pub cached_results_removed: u64,
    pub markers_cleared: u64,
}

/// Implementation of the uninstall tool.
pub async fn uninstall_impl(db: &CacheDb, params: UninstallParams) -> Result<CallToolResult, McpError> {
    if !params.confirm {
        return Err(Error::InvalidInput("uninstall requires confirm=true".into()).into());
    }

    let output = UninstallOutput {
        cached_results_removed: db.count_cached_validations().await?,
        markers_cleared: db.count_validated().await?,
    };
    db.uninstall().await?;

    tracing::warn!(
        cached = output.cached_results_removed,
        markers = output.markers_cleared,
        "removed all validation data"
    );
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{CannedTransport, client_with, decode};
    use mailodds_client::ValidateOptions;
    use mailodds_core::{Directory, OptionStore, ValidationMarker};

    async fn seeded() -> (CacheDb, CannedTransport) {
        let transport = CannedTransport::default();
        transport.reply(200, serde_json::json!({"email": "a@example.com", "status": "valid", "action": "accept"}));
        let (client, db) = client_with(&transport, "key").await;
        client.validate("a@example.com", ValidateOptions::default()).await.unwrap();
        let id = db.insert_identity("b@example.com").await.unwrap();
        db.write_result(id, &ValidationMarker::error(chrono::Utc::now())).await.unwrap();
        (db, transport)
    }

    #[tokio::test]
    async fn test_requires_confirm() {
        let (db, _transport) = seeded().await;

        let err = uninstall_impl(&db, UninstallParams::default()).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert_eq!(db.count_cached_validations().await.unwrap(), 1);
        assert_eq!(db.count_validated().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_removes_validation_data() {
        let (db, _transport) = seeded().await;

        let output: UninstallOutput =
            decode(&uninstall_impl(&db, UninstallParams { confirm: true }).await.unwrap());
        assert_eq!(output.cached_results_removed, 1);
        assert_eq!(output.markers_cleared, 1);

        assert_eq!(db.count_cached_validations().await.unwrap(), 0);
        assert_eq!(db.count_validated().await.unwrap(), 0);
        assert_eq!(db.count_unvalidated().await.unwrap(), 1);
        assert!(db.get_option(mailodds_core::stats::DAILY_STATS_OPTION).await.unwrap().is_none());
    }
}
