//! SQLite-backed stores for validation results, options, and identities.
//!
//! This module provides the host-side collaborators using SQLite with async
//! access via tokio-rusqlite. It supports:
//!
//! - Result cache keyed by a truncated SHA-256 of email and depth, with TTL
//! - Generic named options (daily stats, job bookkeeping)
//! - An identity directory carrying per-identity validation markers
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod hash;
pub mod identities;
pub mod migrations;
pub mod options;
pub mod validations;

pub use crate::Error;

pub use connection::CacheDb;
pub use identities::IdentityRecord;
