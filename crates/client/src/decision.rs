//! Allow/block decisions for submitted addresses.
//!
//! Any client failure allows the submission. An outage of the validation
//! service must not block sign-ups.

use mailodds_core::{Action, Status, Threshold, ValidationResult};

use crate::api::{ClientError, ValidateOptions, ValidationClient, sanitize_email};

/// Why a submission was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// `reject` with `do_not_mail`.
    NotAccepted,
    /// `reject` with any other status.
    Unverified,
    /// `accept_with_caution` under the caution threshold.
    Risky,
    /// `retry_later` under the caution threshold.
    TryLater,
}

impl BlockReason {
    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            BlockReason::NotAccepted => "Error: This email address is not accepted. Please use a different email.",
            BlockReason::Unverified => {
                "Error: This email address could not be verified. Please check and try again."
            }
            BlockReason::Risky => "Error: This email address appears risky. Please use a different email.",
            BlockReason::TryLater => "Error: We could not verify this email at this time. Please try again later.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Block(BlockReason),
}

impl Decision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Decision::Block(_))
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            Decision::Allow => None,
            Decision::Block(reason) => Some(reason.message()),
        }
    }
}

/// Decide on a client outcome. Errors always allow.
pub fn decide(outcome: &Result<ValidationResult, ClientError>, threshold: Threshold) -> Decision {
    match outcome {
        Ok(result) => decide_result(result, threshold),
        Err(_) => Decision::Allow,
    }
}

pub fn decide_result(result: &ValidationResult, threshold: Threshold) -> Decision {
    match (result.action, threshold) {
        (Action::Reject, _) if result.status == Status::DoNotMail => Decision::Block(BlockReason::NotAccepted),
        (Action::Reject, _) => Decision::Block(BlockReason::Unverified),
        (Action::AcceptWithCaution, Threshold::Caution) => Decision::Block(BlockReason::Risky),
        (Action::RetryLater, Threshold::Caution) => Decision::Block(BlockReason::TryLater),
        _ => Decision::Allow,
    }
}

/// Runs submitted addresses through the client and the configured threshold.
#[derive(Debug, Clone)]
pub struct EmailGuard {
    client: ValidationClient,
    threshold: Threshold,
}

impl EmailGuard {
    pub fn new(client: ValidationClient, threshold: Threshold) -> Self {
        Self { client, threshold }
    }

    pub fn client(&self) -> &ValidationClient {
        &self.client
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Check one submitted address.
    ///
    /// Input with nothing to validate is allowed without calling the client.
    pub async fn check(&self, email: &str) -> Decision {
        if sanitize_email(email).is_none() {
            return Decision::Allow;
        }

        let outcome = self.client.validate(email, ValidateOptions::default()).await;
        if let Err(e) = &outcome {
            tracing::warn!("validation failed, allowing submission: {}", e);
        }

        decide(&outcome, self.threshold)
    }
}
