//! Domain model shared by the client, the stores, and the server.
//!
//! Field names follow the remote service's JSON contract
//! (`POST /v1/validate`, `POST /v1/validate/batch`).

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Validation thoroughness tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// Syntax and DNS checks only.
    Standard,
    /// Full mailbox-level check. The remote service's implicit default.
    #[default]
    Enhanced,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Standard => "standard",
            Depth::Enhanced => "enhanced",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site policy deciding whether risky or unverifiable addresses block a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Threshold {
    /// Block only `reject`.
    #[default]
    Reject,
    /// Also block `accept_with_caution` and `retry_later`.
    Caution,
}

impl Threshold {
    pub fn as_str(&self) -> &'static str {
        match self {
            Threshold::Reject => "reject",
            Threshold::Caution => "caution",
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deliverability status reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Valid,
    Invalid,
    CatchAll,
    DoNotMail,
    Unknown,
    /// Any status this crate does not know about.
    #[serde(other)]
    Other,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Valid => "valid",
            Status::Invalid => "invalid",
            Status::CatchAll => "catch_all",
            Status::DoNotMail => "do_not_mail",
            Status::Unknown => "unknown",
            Status::Other => "other",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommended disposition of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Accept,
    Reject,
    AcceptWithCaution,
    RetryLater,
    /// Any action this crate does not know about. Never blocks.
    #[serde(other)]
    Other,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Accept => "accept",
            Action::Reject => "reject",
            Action::AcceptWithCaution => "accept_with_caution",
            Action::RetryLater => "retry_later",
            Action::Other => "other",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation result, either fresh from the remote service or read back from cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub email: String,
    pub status: Status,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_status: Option<String>,
    #[serde(default)]
    pub free_provider: bool,
    #[serde(default)]
    pub disposable: bool,
    #[serde(default)]
    pub role_account: bool,
    #[serde(default)]
    pub mx_found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
    /// Service timestamp, kept as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<String>,
    /// Set by the client on the cache-hit path only; never read from the wire.
    #[serde(default, skip_deserializing)]
    pub cached: bool,
}

/// A directory entry awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Identity {
    pub id: i64,
    pub email: String,
}

/// Per-identity validation marker written back by the batch runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationMarker {
    pub status: String,
    pub action: String,
    pub validated_at: DateTime<Utc>,
}

impl ValidationMarker {
    /// Status written when a page could not be validated.
    pub const ERROR_STATUS: &'static str = "error";

    pub fn from_result(result: &ValidationResult, validated_at: DateTime<Utc>) -> Self {
        Self { status: result.status.as_str().to_string(), action: result.action.as_str().to_string(), validated_at }
    }

    /// Terminal marker for identities whose page failed; keeps them out of later pages.
    pub fn error(validated_at: DateTime<Utc>) -> Self {
        Self {
            status: Self::ERROR_STATUS.to_string(),
            action: Action::RetryLater.as_str().to_string(),
            validated_at,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == Self::ERROR_STATUS
    }
}
