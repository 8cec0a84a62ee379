//! mailodds server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use mailodds_client::{ScheduledValidationJob, ValidationClient};
use mailodds_core::{AppConfig, CacheDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    if let Err(e) = config.require_api_key() {
        tracing::warn!("{e}; validation tools will fail until it is configured");
    } else if config.is_test_mode() {
        tracing::info!("Using a test API key");
    }

    let db = CacheDb::open(&config.db_path).await?;
    let client = ValidationClient::from_app_config(&config, db.clone())?;

    if config.cron_enabled && config.has_api_key() {
        let job = ScheduledValidationJob::from_config(client.clone(), Arc::new(db.clone()), &config);
        Arc::new(job).start().await;
    }

    tracing::info!(db_path = %config.db_path.display(), "Starting mailodds server on stdio transport");

    let handler = handler::MailOddsServer::new(db, Arc::new(config), client);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
