//! validation_status tool implementation.
//!
//! Reports configuration, today's and last week's counters, the last
//! scheduled run, identity progress, and the latest validated identities.

use chrono::Utc;
use mailodds_client::ValidationClient;
use mailodds_core::{AppConfig, CacheDb, CronStats, DayCounters, Depth, FormIntegration, IdentityRecord, Threshold};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Days covered by the rolling totals.
const RECENT_DAYS: u64 = 7;

/// Validated identities listed in the report.
const RECENT_IDENTITIES: usize = 10;

/// Output structure for validation_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidationStatusOutput {
    pub version: String,
    pub key_configured: bool,
    pub test_mode: bool,
    pub depth: Depth,
    pub action_threshold: Threshold,
    pub policy_id: u32,
    pub cron_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cron: Option<CronStats>,
    pub integrations: Vec<FormIntegration>,
    pub today: DayCounters,
    pub last_7_days: DayCounters,
    pub validated_identities: u64,
    pub unvalidated_identities: u64,
    pub cached_results: u64,
    /// Latest validated identities, newest first.
    pub recent: Vec<IdentityRecord>,
}

/// Implementation of the validation_status tool.
pub async fn status_impl(
    client: &ValidationClient, db: &CacheDb, config: &AppConfig,
) -> Result<CallToolResult, McpError> {
    let stats = client.stats().load().await?;
    let today = Utc::now().date_naive();

    let output = ValidationStatusOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        key_configured: client.has_key(),
        test_mode: client.is_test_mode(),
        depth: config.depth,
        action_threshold: config.action_threshold,
        policy_id: config.policy_id,
        cron_enabled: config.cron_enabled,
        last_cron: client.stats().load_cron().await?,
        integrations: config.integrations.clone(),
        today: stats.day(today),
        last_7_days: stats.totals_for_last(RECENT_DAYS, today),
        validated_identities: db.count_validated().await?,
        unvalidated_identities: db.count_unvalidated().await?,
        cached_results: db.count_cached_validations().await?,
        recent: db.recent_validated(RECENT_IDENTITIES).await?,
    };

    json_result(&output)
}
