//! cache_purge tool implementation.
//!
//! Purges expired validation results, or all of them.

use mailodds_core::CacheDb;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Purge every cached result, not only expired ones.
    #[serde(default)]
    pub all: bool,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CacheDb, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let deleted =
        if params.all { cache.purge_all_validations().await? } else { cache.purge_expired_validations().await? };

    tracing::info!(deleted, all = params.all, "purged validation cache");
    json_result(&CachePurgeOutput { deleted })
}
