//! Daily validation counters.
//!
//! Counters are keyed by UTC calendar date and persisted as a single named option.
//! Only live validations are recorded; cache hits never reach this module.
//! Every write prunes dates older than [`RETENTION_DAYS`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::Status;
use crate::store::OptionStore;

/// Option name holding the serialized [`DailyStats`].
pub const DAILY_STATS_OPTION: &str = "daily_stats";

/// Option name holding the last [`CronStats`].
pub const CRON_STATS_OPTION: &str = "cron_stats";

/// Days of history kept behind today.
pub const RETENTION_DAYS: u64 = 30;

/// Fixed-shape counters for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DayCounters {
    pub total: u64,
    pub valid: u64,
    pub invalid: u64,
    pub catch_all: u64,
    pub unknown: u64,
    pub do_not_mail: u64,
}

impl DayCounters {
    /// Count one validation. Unrecognized statuses only bump `total`.
    pub fn record(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Valid => self.valid += 1,
            Status::Invalid => self.invalid += 1,
            Status::CatchAll => self.catch_all += 1,
            Status::Unknown => self.unknown += 1,
            Status::DoNotMail => self.do_not_mail += 1,
            Status::Other => {}
        }
    }

    pub fn add(&mut self, other: &DayCounters) {
        self.total += other.total;
        self.valid += other.valid;
        self.invalid += other.invalid;
        self.catch_all += other.catch_all;
        self.unknown += other.unknown;
        self.do_not_mail += other.do_not_mail;
    }
}

/// Date-keyed counter map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DailyStats {
    days: BTreeMap<NaiveDate, DayCounters>,
}

impl DailyStats {
    /// Count one validation on `day`, then prune relative to `day`.
    pub fn record(&mut self, status: Status, day: NaiveDate) {
        self.days.entry(day).or_default().record(status);
        self.prune(day);
    }

    /// Drop every date older than `today - RETENTION_DAYS`.
    pub fn prune(&mut self, today: NaiveDate) {
        let Some(cutoff) = today.checked_sub_days(Days::new(RETENTION_DAYS)) else {
            return;
        };
        self.days.retain(|date, _| *date >= cutoff);
    }

    /// Counters for a single day, zeroed if nothing was recorded.
    pub fn day(&self, date: NaiveDate) -> DayCounters {
        self.days.get(&date).copied().unwrap_or_default()
    }

    /// Counters for the current UTC date.
    pub fn today(&self) -> DayCounters {
        self.day(Utc::now().date_naive())
    }

    /// Sum of the `days` most recent dates ending at `today` (inclusive).
    pub fn totals_for_last(&self, days: u64, today: NaiveDate) -> DayCounters {
        let mut totals = DayCounters::default();
        for offset in 0..days {
            if let Some(date) = today.checked_sub_days(Days::new(offset)) {
                totals.add(&self.day(date));
            }
        }
        totals
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }
}

/// Persistent daily stats, owned by the validation client.
#[derive(Clone)]
pub struct StatsStore {
    options: Arc<dyn OptionStore>,
}

impl StatsStore {
    pub fn new(options: Arc<dyn OptionStore>) -> Self {
        Self { options }
    }

    /// Load the current stats map. A missing option is an empty map.
    pub async fn load(&self) -> Result<DailyStats, Error> {
        match self.options.get_option(DAILY_STATS_OPTION).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(DailyStats::default()),
        }
    }

    /// Record one live validation for today (UTC) and persist.
    pub async fn record(&self, status: Status) -> Result<DailyStats, Error> {
        self.record_on(status, Utc::now().date_naive()).await
    }

    /// Record one live validation for an explicit date and persist.
    pub async fn record_on(&self, status: Status, day: NaiveDate) -> Result<DailyStats, Error> {
        let mut stats = self.load().await?;
        stats.record(status, day);
        self.options
            .set_option(DAILY_STATS_OPTION, &serde_json::to_value(&stats)?)
            .await?;
        Ok(stats)
    }

    /// Forget all recorded stats.
    pub async fn clear(&self) -> Result<bool, Error> {
        self.options.delete_option(DAILY_STATS_OPTION).await
    }

    pub async fn load_cron(&self) -> Result<Option<CronStats>, Error> {
        match self.options.get_option(CRON_STATS_OPTION).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn save_cron(&self, stats: &CronStats) -> Result<(), Error> {
        self.options.set_option(CRON_STATS_OPTION, &serde_json::to_value(stats)?).await
    }
}

/// Summary of the last scheduled validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CronStats {
    pub last_run: DateTime<Utc>,
    /// Identities marked in that run.
    pub last_count: u64,
}

impl std::fmt::Debug for StatsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheDb;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_record_known_statuses() {
        let mut stats = DailyStats::default();
        let day = date("2026-10-16");
        stats.record(Status::Valid, day);
        stats.record(Status::Valid, day);
        stats.record(Status::DoNotMail, day);
        stats.record(Status::CatchAll, day);

        let counters = stats.day(day);
        assert_eq!(counters.total, 4);
        assert_eq!(counters.valid, 2);
        assert_eq!(counters.do_not_mail, 1);
        assert_eq!(counters.catch_all, 1);
        assert_eq!(counters.invalid, 0);
    }

    #[test]
    fn test_unrecognized_status_counts_total_only() {
        let mut stats = DailyStats::default();
        let day = date("2026-10-16");
        stats.record(Status::Other, day);

        let counters = stats.day(day);
        assert_eq!(counters.total, 1);
        assert_eq!(counters.valid + counters.invalid + counters.catch_all + counters.unknown + counters.do_not_mail, 0);
    }

    #[test]
    fn test_prune_keeps_thirty_days() {
        let mut stats = DailyStats::default();
        stats.record(Status::Valid, date("2026-09-15"));
        stats.record(Status::Valid, date("2026-09-16"));
        stats.record(Status::Valid, date("2026-10-01"));

        stats.record(Status::Invalid, date("2026-10-16"));

        let dates: Vec<_> = stats.dates().copied().collect();
        assert_eq!(dates, vec![date("2026-09-16"), date("2026-10-01"), date("2026-10-16")]);
    }

    #[test]
    fn test_totals_for_last_week() {
        let mut stats = DailyStats::default();
        stats.record(Status::Valid, date("2026-10-09"));
        stats.record(Status::Valid, date("2026-10-10"));
        stats.record(Status::Invalid, date("2026-10-16"));

        let totals = stats.totals_for_last(7, date("2026-10-16"));
        assert_eq!(totals.total, 2);
        assert_eq!(totals.valid, 1);
        assert_eq!(totals.invalid, 1);
    }

    #[test]
    fn test_serialized_shape() {
        let mut stats = DailyStats::default();
        stats.record(Status::Valid, date("2026-10-16"));

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["2026-10-16"]["total"], 1);
        assert_eq!(value["2026-10-16"]["valid"], 1);

        let back: DailyStats = serde_json::from_value(value).unwrap();
        assert_eq!(back, stats);
    }

    #[tokio::test]
    async fn test_store_persists_between_loads() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let store = StatsStore::new(Arc::new(db));
        let day = date("2026-10-16");

        assert!(store.load().await.unwrap().is_empty());

        store.record_on(Status::Valid, day).await.unwrap();
        store.record_on(Status::Unknown, day).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.day(day).total, 2);
        assert_eq!(loaded.day(day).unknown, 1);

        assert!(store.clear().await.unwrap());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cron_stats_round_trip() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let store = StatsStore::new(Arc::new(db));
        assert!(store.load_cron().await.unwrap().is_none());

        let stats = CronStats { last_run: Utc::now(), last_count: 12 };
        store.save_cron(&stats).await.unwrap();
        assert_eq!(store.load_cron().await.unwrap(), Some(stats));
    }
}
