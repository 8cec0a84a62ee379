//! email_check tool implementation.
//!
//! Runs an address through the allow/block decision used for form gating.
//! Service failures allow the address.

use mailodds_client::{Decision, ValidateOptions, ValidationClient, decide, sanitize_email};
use mailodds_core::{Threshold, ValidationResult};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for email_check tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmailCheckParams {
    /// Submitted email address.
    pub email: String,

    /// Blocking threshold: "reject" or "caution". Defaults to the configured threshold.
    #[serde(default)]
    pub threshold: Option<Threshold>,
}

/// Output structure for email_check tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmailCheckOutput {
    pub allowed: bool,
    /// User-facing message when blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub threshold: Threshold,
    /// Validation result, when one was obtained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ValidationResult>,
    /// Validation error that was ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the ignored error is a local setup problem, such as a missing API key.
    #[serde(default)]
    pub misconfigured: bool,
}

/// Implementation of the email_check tool.
pub async fn check_impl(
    client: &ValidationClient, default_threshold: Threshold, params: EmailCheckParams,
) -> Result<CallToolResult, McpError> {
    let threshold = params.threshold.unwrap_or(default_threshold);

    if sanitize_email(&params.email).is_none() {
        let output =
            EmailCheckOutput { allowed: true, message: None, threshold, result: None, error: None, misconfigured: false };
        return json_result(&output);
    }

    let outcome = client.validate(&params.email, ValidateOptions::default()).await;
    let decision = decide(&outcome, threshold);
    let (result, error, misconfigured) = match outcome {
        Ok(result) => (Some(result), None, false),
        Err(e) if e.is_configuration() => {
            tracing::error!("email_check failing open on setup error: {}", e);
            (None, Some(e.to_string()), true)
        }
        Err(e) => {
            tracing::warn!("email_check failing open: {}", e);
            (None, Some(e.to_string()), false)
        }
    };

    let output = EmailCheckOutput {
        allowed: decision == Decision::Allow,
        message: decision.message().map(str::to_string),
        threshold,
        result,
        error,
        misconfigured,
    };
    json_result(&output)
}
