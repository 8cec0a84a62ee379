//! email_validate tool implementation.
//!
//! Validates a single address, using the result cache unless told otherwise.

use mailodds_client::{ValidateOptions, ValidationClient};
use mailodds_core::{Depth, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for email_validate tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmailValidateParams {
    /// Email address to validate (required).
    pub email: String,

    /// Validation depth: "standard" or "enhanced". Defaults to the configured depth.
    #[serde(default)]
    pub depth: Option<Depth>,

    /// Validation policy id. Defaults to the configured policy; 0 means none.
    #[serde(default)]
    pub policy_id: Option<u32>,

    /// Bypass the result cache.
    #[serde(default)]
    pub skip_cache: bool,
}

/// Implementation of the email_validate tool.
pub async fn validate_impl(client: &ValidationClient, params: EmailValidateParams) -> Result<CallToolResult, McpError> {
    let opts = ValidateOptions { depth: params.depth, policy_id: params.policy_id, skip_cache: params.skip_cache };
    let result = client.validate(&params.email, opts).await.map_err(Error::from)?;

    json_result(&result)
}
