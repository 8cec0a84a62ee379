//! Periodic validation of unvalidated identities.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mailodds_core::{AppConfig, CronStats, Directory, Error};
use tracing::{error, info};

use crate::api::ValidationClient;
use crate::bulk::{BulkRunner, DEFAULT_BATCH_SIZE, FailedPage};

/// Default interval: weekly.
const DEFAULT_INTERVAL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Validates one page of unvalidated identities per tick.
///
/// A failed batch leaves the page unmarked for the next tick.
pub struct ScheduledValidationJob {
    client: ValidationClient,
    directory: Arc<dyn Directory>,
    batch_size: usize,
    interval: Duration,
}

impl ScheduledValidationJob {
    pub fn new(client: ValidationClient, directory: Arc<dyn Directory>) -> Self {
        Self { client, directory, batch_size: DEFAULT_BATCH_SIZE, interval: DEFAULT_INTERVAL }
    }

    pub fn from_config(client: ValidationClient, directory: Arc<dyn Directory>, config: &AppConfig) -> Self {
        Self::new(client, directory)
            .with_batch_size(config.bulk_batch_size)
            .with_interval(config.cron_interval())
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval.as_secs(), batch_size = self.batch_size, "Starting scheduled validation job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            // the first tick completes immediately; wait a full period before the first run
            interval.tick().await;
            loop {
                interval.tick().await;
                match self.run_once().await {
                    Ok(Some(stats)) => info!(count = stats.last_count, "Scheduled validation completed"),
                    Ok(None) => info!("Scheduled validation had nothing to do"),
                    Err(e) => error!(error = %e, "Scheduled validation failed"),
                }
            }
        });
    }

    /// Run one page now.
    ///
    /// Returns the stored [`CronStats`], or `None` when there was no key, no
    /// identity to validate, or the batch call failed.
    pub async fn run_once(&self) -> Result<Option<CronStats>, Error> {
        if !self.client.has_key() {
            return Ok(None);
        }

        let runner = BulkRunner::new(self.client.clone(), self.directory.clone())
            .with_batch_size(self.batch_size)
            .on_failed_page(FailedPage::LeaveUnmarked);
        let page = runner.run_page(0).await?;

        if page.batch == 0 || page.failed {
            return Ok(None);
        }

        let stats = CronStats { last_run: Utc::now(), last_count: page.processed as u64 };
        self.client.stats().save_cron(&stats).await?;
        Ok(Some(stats))
    }
}
