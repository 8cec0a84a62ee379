//! Core types and shared functionality for mailodds.
//!
//! This crate provides:
//! - Domain model for validation results and policies
//! - Collaborator traits for the result cache, named options, and the identity directory
//! - SQLite-backed implementations of those collaborators
//! - Daily statistics tracking
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod stats;
pub mod store;

pub use cache::{CacheDb, IdentityRecord};
pub use cache::hash::cache_key;
pub use config::{AppConfig, ConfigError, FormIntegration};
pub use error::Error;
pub use model::{Action, Depth, Identity, Status, Threshold, ValidationMarker, ValidationResult};
pub use stats::{CronStats, DailyStats, DayCounters, StatsStore};
pub use store::{Directory, OptionStore, ResultCache};
