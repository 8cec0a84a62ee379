//! Cache-related MCP tools.
//!
//! This module provides tools for maintaining the validation result cache.

pub mod purge;

pub use purge::{CachePurgeOutput, CachePurgeParams, purge_impl};
