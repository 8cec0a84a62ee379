//! email_validate_batch tool implementation.

use mailodds_client::{ValidateOptions, ValidationClient};
use mailodds_core::{Depth, Error, ValidationResult};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Largest batch accepted in one call.
const MAX_BATCH: usize = 1000;

/// Input parameters for email_validate_batch tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmailValidateBatchParams {
    /// Addresses to validate. Invalid entries and duplicates are dropped.
    pub emails: Vec<String>,

    /// Validation depth: "standard" or "enhanced".
    #[serde(default)]
    pub depth: Option<Depth>,

    /// Validation policy id; 0 means none.
    #[serde(default)]
    pub policy_id: Option<u32>,
}

/// Output structure for email_validate_batch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmailValidateBatchOutput {
    pub count: usize,
    pub results: Vec<ValidationResult>,
}

/// Implementation of the email_validate_batch tool.
pub async fn validate_batch_impl(
    client: &ValidationClient, params: EmailValidateBatchParams,
) -> Result<CallToolResult, McpError> {
    if params.emails.len() > MAX_BATCH {
        return Err(Error::InvalidInput(format!("at most {MAX_BATCH} emails per batch")).into());
    }

    let opts = ValidateOptions { depth: params.depth, policy_id: params.policy_id, skip_cache: false };
    let results = client.validate_batch(&params.emails, opts).await.map_err(Error::from)?;

    json_result(&EmailValidateBatchOutput { count: results.len(), results })
}
