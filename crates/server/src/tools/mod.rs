//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mailodds server.
#![allow(unused_imports)]

pub mod bulk_validate;
pub mod cache;
pub mod email_check;
pub mod email_validate;
pub mod email_validate_batch;
pub mod identity_import;
pub mod uninstall;
pub mod validation_status;

pub use bulk_validate::{BulkValidateOutput, BulkValidateParams};
pub use email_check::{EmailCheckOutput, EmailCheckParams};
pub use email_validate::EmailValidateParams;
pub use email_validate_batch::{EmailValidateBatchOutput, EmailValidateBatchParams};
pub use identity_import::{IdentityImportOutput, IdentityImportParams};
pub use uninstall::{UninstallOutput, UninstallParams};
pub use validation_status::ValidationStatusOutput;

use mailodds_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Wrap a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::Serialization(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
