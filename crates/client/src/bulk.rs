//! Sequential batch validation over the identity directory.
//!
//! Each page pulls identities without a validation marker, validates them in
//! one batch call, and writes a marker back to every identity in the page.
//! Marked identities drop out of later pages, so a run always terminates.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use mailodds_core::{DayCounters, Directory, Error, Identity, ValidationMarker, ValidationResult};
use serde::Serialize;

use crate::api::{ValidateOptions, ValidationClient};

/// Default page size.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// What to do with a page whose batch call failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailedPage {
    /// Write the `error`/`retry_later` marker and move on.
    #[default]
    MarkError,
    /// Leave the identities unmarked and stop the run.
    LeaveUnmarked,
}

/// Outcome of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageReport {
    /// No further page should be requested.
    pub done: bool,
    /// Running total: the caller's offset plus identities marked in this page.
    pub processed: usize,
    /// Identities fetched in this page.
    pub batch: usize,
    /// Identities in this page that received the error marker.
    pub errors: usize,
    /// Whether the batch call failed.
    pub failed: bool,
    pub by_status: DayCounters,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    /// Identities marked, errors included.
    pub processed: usize,
    pub errors: usize,
    /// Non-empty pages handled.
    pub pages: usize,
    pub by_status: DayCounters,
}

pub struct BulkRunner {
    client: ValidationClient,
    directory: Arc<dyn Directory>,
    batch_size: usize,
    limit: usize,
    on_failure: FailedPage,
}

impl std::fmt::Debug for BulkRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkRunner")
            .field("batch_size", &self.batch_size)
            .field("limit", &self.limit)
            .field("on_failure", &self.on_failure)
            .finish_non_exhaustive()
    }
}

impl BulkRunner {
    pub fn new(client: ValidationClient, directory: Arc<dyn Directory>) -> Self {
        Self { client, directory, batch_size: DEFAULT_BATCH_SIZE, limit: 0, on_failure: FailedPage::default() }
    }

    /// Page size. 0 falls back to the default.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = if batch_size == 0 { DEFAULT_BATCH_SIZE } else { batch_size };
        self
    }

    /// Cap on identities per run. 0 means unlimited.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn on_failed_page(mut self, on_failure: FailedPage) -> Self {
        self.on_failure = on_failure;
        self
    }

    /// Page size for a caller that has already processed `offset` identities.
    fn page_size(&self, offset: usize) -> usize {
        if self.limit > 0 { self.batch_size.min(self.limit.saturating_sub(offset)) } else { self.batch_size }
    }

    /// Run exactly one page, for callers that drive the run incrementally.
    ///
    /// `offset` is the number of identities already processed in this run;
    /// it only counts towards the limit. Directory failures are returned.
    pub async fn run_page(&self, offset: usize) -> Result<PageReport, Error> {
        let size = self.page_size(offset);
        if size == 0 {
            return Ok(PageReport { done: true, processed: offset, ..Default::default() });
        }

        let page = self.directory.list_unvalidated(size).await?;
        if page.is_empty() {
            return Ok(PageReport { done: true, processed: offset, ..Default::default() });
        }

        let emails: Vec<&str> = page.iter().map(|i| i.email.as_str()).collect();
        let mut report = PageReport { batch: page.len(), ..Default::default() };

        match self.client.validate_batch(emails, ValidateOptions::default()).await {
            Ok(results) => {
                self.write_results(&page, &results, &mut report).await?;
            }
            Err(e) => {
                tracing::warn!("batch of {} failed: {}", page.len(), e);
                report.failed = true;
                if self.on_failure == FailedPage::MarkError {
                    let marker = ValidationMarker::error(Utc::now());
                    for identity in &page {
                        self.directory.write_result(identity.id, &marker).await?;
                    }
                    report.errors = page.len();
                }
            }
        }

        let marked = if report.failed && self.on_failure == FailedPage::LeaveUnmarked { 0 } else { page.len() };
        report.processed = offset + marked;
        report.done = (self.limit > 0 && report.processed >= self.limit)
            || (report.failed && self.on_failure == FailedPage::LeaveUnmarked);

        Ok(report)
    }

    async fn write_results(
        &self, page: &[Identity], results: &[ValidationResult], report: &mut PageReport,
    ) -> Result<(), Error> {
        let by_email: HashMap<String, &ValidationResult> =
            results.iter().map(|r| (r.email.trim().to_lowercase(), r)).collect();
        let now = Utc::now();

        for identity in page {
            let found = by_email.get(&identity.email.trim().to_lowercase()).copied();
            let marker = match found {
                Some(result) => ValidationMarker::from_result(result, now),
                None => {
                    tracing::debug!("no result for identity {}", identity.id);
                    ValidationMarker::error(now)
                }
            };
            match found {
                Some(result) if !marker.is_error() => report.by_status.record(result.status),
                _ => report.errors += 1,
            }
            self.directory.write_result(identity.id, &marker).await?;
        }

        Ok(())
    }

    /// Run pages until the directory is exhausted or the limit is reached.
    pub async fn run(&self) -> Result<BulkSummary, Error> {
        let mut summary = BulkSummary::default();

        loop {
            let page = self.run_page(summary.processed).await?;
            if page.batch > 0 {
                summary.pages += 1;
                summary.errors += page.errors;
                summary.by_status.add(&page.by_status);
                tracing::info!("bulk page {}: {} identities, {} errors", summary.pages, page.batch, page.errors);
            }
            summary.processed = page.processed;
            if page.done {
                break;
            }
        }

        tracing::info!("bulk run finished: {} processed, {} errors", summary.processed, summary.errors);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientError;
    use crate::test_support::{StubTransport, client_with};
    use mailodds_core::CacheDb;

    async fn seed(db: &CacheDb, emails: &[&str]) -> Vec<i64> {
        let mut ids = Vec::new();
        for email in emails {
            ids.push(db.insert_identity(email).await.unwrap());
        }
        ids
    }

    fn results_for(emails: &[&str], status: &str, action: &str) -> serde_json::Value {
        let results: Vec<_> = emails
            .iter()
            .map(|e| serde_json::json!({"email": e, "status": status, "action": action}))
            .collect();
        serde_json::json!({ "results": results })
    }

    #[tokio::test]
    async fn test_run_marks_every_identity() {
        let transport = StubTransport::new();
        let (client, db) = client_with(&transport, "key").await;
        seed(&db, &["a@example.com", "b@example.com", "c@example.com"]).await;

        transport.reply(200, results_for(&["a@example.com", "b@example.com"], "valid", "accept"));
        transport.reply(200, results_for(&["c@example.com"], "invalid", "reject"));

        let runner = BulkRunner::new(client, Arc::new(db.clone())).with_batch_size(2);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.by_status.valid, 2);
        assert_eq!(summary.by_status.invalid, 1);
        assert_eq!(db.count_unvalidated().await.unwrap(), 0);
        // two pages plus the final empty fetch, which makes no request
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_page_marks_error_and_continues() {
        let transport = StubTransport::new();
        let (client, db) = client_with(&transport, "key").await;
        let ids = seed(&db, &["a@example.com", "b@example.com", "c@example.com", "d@example.com"]).await;

        transport.fail(ClientError::Network("timeout".into()));
        transport.reply(200, results_for(&["c@example.com", "d@example.com"], "valid", "accept"));

        let runner = BulkRunner::new(client, Arc::new(db.clone())).with_batch_size(2);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.processed, 4);
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.pages, 2);

        let first = db.get_identity(ids[0]).await.unwrap().unwrap();
        assert_eq!(first.status.as_deref(), Some("error"));
        assert_eq!(first.action.as_deref(), Some("retry_later"));
        let last = db.get_identity(ids[3]).await.unwrap().unwrap();
        assert_eq!(last.status.as_deref(), Some("valid"));
    }

    #[tokio::test]
    async fn test_missing_result_gets_error_marker() {
        let transport = StubTransport::new();
        let (client, db) = client_with(&transport, "key").await;
        let ids = seed(&db, &["A@Example.com", "b@example.com"]).await;

        transport.reply(200, results_for(&["a@example.com"], "catch_all", "accept_with_caution"));

        let runner = BulkRunner::new(client, Arc::new(db.clone()));
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.by_status.catch_all, 1);

        let matched = db.get_identity(ids[0]).await.unwrap().unwrap();
        assert_eq!(matched.status.as_deref(), Some("catch_all"));
        let missing = db.get_identity(ids[1]).await.unwrap().unwrap();
        assert_eq!(missing.status.as_deref(), Some("error"));
    }

    #[tokio::test]
    async fn test_limit_caps_run() {
        let transport = StubTransport::new();
        let (client, db) = client_with(&transport, "key").await;
        seed(&db, &["a@example.com", "b@example.com", "c@example.com"]).await;

        transport.reply(200, results_for(&["a@example.com", "b@example.com"], "valid", "accept"));

        let runner = BulkRunner::new(client, Arc::new(db.clone())).with_batch_size(50).with_limit(2);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(db.count_unvalidated().await.unwrap(), 1);
        let body = &transport.requests()[0].body;
        assert_eq!(body["emails"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_run_page_reports() {
        let transport = StubTransport::new();
        let (client, db) = client_with(&transport, "key").await;
        seed(&db, &["a@example.com"]).await;
        transport.reply(200, results_for(&["a@example.com"], "valid", "accept"));

        let runner = BulkRunner::new(client, Arc::new(db.clone()));
        let first = runner.run_page(10).await.unwrap();
        assert!(!first.done);
        assert_eq!(first.batch, 1);
        assert_eq!(first.processed, 11);

        let second = runner.run_page(first.processed).await.unwrap();
        assert!(second.done);
        assert_eq!(second.batch, 0);
        assert_eq!(second.processed, 11);
    }

    #[tokio::test]
    async fn test_leave_unmarked_stops_run() {
        let transport = StubTransport::new();
        let (client, db) = client_with(&transport, "key").await;
        seed(&db, &["a@example.com", "b@example.com"]).await;
        transport.fail(ClientError::Api { status: 503, message: "down".into() });

        let runner = BulkRunner::new(client, Arc::new(db.clone())).on_failed_page(FailedPage::LeaveUnmarked);
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.processed, 0);
        assert_eq!(summary.pages, 1);
        assert_eq!(db.count_unvalidated().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_page_size() {
        let transport = StubTransport::new();
        let (client, db) = client_with(&transport, "key").await;

        let runner = BulkRunner::new(client.clone(), Arc::new(db.clone())).with_batch_size(0);
        assert_eq!(runner.page_size(0), DEFAULT_BATCH_SIZE);

        let runner = BulkRunner::new(client, Arc::new(db)).with_batch_size(20).with_limit(45);
        assert_eq!(runner.page_size(0), 20);
        assert_eq!(runner.page_size(40), 5);
        assert_eq!(runner.page_size(45), 0);
    }
}
