//! bulk_validate tool implementation.
//!
//! Validates unvalidated identities page by page until none remain or the
//! limit is reached.

use std::sync::Arc;

use mailodds_client::{BulkRunner, ValidationClient};
use mailodds_core::{CacheDb, DayCounters, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for bulk_validate tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BulkValidateParams {
    /// Page size (1-1000). Defaults to the configured batch size.
    #[serde(default)]
    pub batch_size: Option<usize>,

    /// Maximum identities to process; 0 or absent means unlimited.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Output structure for bulk_validate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BulkValidateOutput {
    pub processed: usize,
    pub errors: usize,
    pub pages: usize,
    pub by_status: DayCounters,
}

/// Implementation of the bulk_validate tool.
pub async fn bulk_impl(
    client: &ValidationClient, db: &CacheDb, default_batch_size: usize, params: BulkValidateParams,
) -> Result<CallToolResult, McpError> {
    if !client.has_key() {
        return Err(Error::NoApiKey("API key not configured".into()).into());
    }

    let batch_size = params.batch_size.unwrap_or(default_batch_size);
    if !(1..=1000).contains(&batch_size) {
        return Err(Error::InvalidInput(format!("batch_size must be between 1 and 1000, got {batch_size}")).into());
    }

    let runner = BulkRunner::new(client.clone(), Arc::new(db.clone()))
        .with_batch_size(batch_size)
        .with_limit(params.limit.unwrap_or(0));
    let summary = runner.run().await?;

    json_result(&BulkValidateOutput {
        processed: summary.processed,
        errors: summary.errors,
        pages: summary.pages,
        by_status: summary.by_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{CannedTransport, client_with, decode};

    #[tokio::test]
    async fn test_bulk_run() {
        let transport = CannedTransport::default();
        transport.reply(
            200,
            serde_json::json!({"results": [
                {"email": "a@example.com", "status": "valid", "action": "accept"},
                {"email": "b@example.com", "status": "invalid", "action": "reject"}
            ]}),
        );
        let (client, db) = client_with(&transport, "key").await;
        db.insert_identity("a@example.com").await.unwrap();
        db.insert_identity("b@example.com").await.unwrap();

        let output: BulkValidateOutput =
            decode(&bulk_impl(&client, &db, 50, BulkValidateParams::default()).await.unwrap());
        assert_eq!(output.processed, 2);
        assert_eq!(output.pages, 1);
        assert_eq!(output.by_status.valid, 1);
        assert_eq!(output.by_status.invalid, 1);
        assert_eq!(db.count_validated().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_bulk_requires_key() {
        let transport = CannedTransport::default();
        let (client, db) = client_with(&transport, "").await;

        let err = bulk_impl(&client, &db, 50, BulkValidateParams::default()).await.unwrap_err();
        assert_eq!(err.code.0, -32009);
    }

    #[tokio::test]
    async fn test_bulk_rejects_bad_batch_size() {
        let transport = CannedTransport::default();
        let (client, db) = client_with(&transport, "key").await;

        let params = BulkValidateParams { batch_size: Some(0), limit: None };
        let err = bulk_impl(&client, &db, 50, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
