//! identity_import tool implementation.
//!
//! Adds addresses to the identity directory so bulk and scheduled runs can
//! pick them up.

use mailodds_client::sanitize_batch;
use mailodds_core::{CacheDb, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for identity_import tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdentityImportParams {
    /// Addresses to add. Invalid entries and duplicates are dropped.
    pub emails: Vec<String>,
}

/// Output structure for identity_import tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdentityImportOutput {
    pub imported: usize,
    pub ids: Vec<i64>,
    /// Entries dropped by sanitization or deduplication.
    pub skipped: usize,
}

/// Implementation of the identity_import tool.
pub async fn import_impl(db: &CacheDb, params: IdentityImportParams) -> Result<CallToolResult, McpError> {
    let emails = sanitize_batch(&params.emails);
    if emails.is_empty() {
        return Err(Error::NoEmails("no valid emails provided".into()).into());
    }

    let mut ids = Vec::with_capacity(emails.len());
    for email in &emails {
        ids.push(db.insert_identity(email).await?);
    }

    json_result(&IdentityImportOutput { imported: ids.len(), skipped: params.emails.len() - emails.len(), ids })
}
