//! Form integrations.
//!
//! Each adapter knows how to pull candidate addresses out of one form
//! framework's submission and how to report a rejection back in that
//! framework's terms. [`FormGate`] runs the decision for every candidate.

pub mod cf7;
pub mod gravity;
pub mod woocommerce;
pub mod wordpress;
pub mod wpforms;

pub use cf7::{Cf7Submission, ContactForm7};
pub use gravity::{FieldValue, GravityFieldValidation, GravityForms};
pub use woocommerce::{WooCheckout, WooCheckoutSubmission, WooRegistration, WooRegistrationSubmission};
pub use wordpress::{ErrorList, WpRegistration, WpRegistrationSubmission};
pub use wpforms::{WpForms, WpFormsField, WpFormsSubmission};

use mailodds_core::{AppConfig, FormIntegration};

use crate::decision::{Decision, EmailGuard};

/// An address found in a submission, with the field it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub field: String,
    pub email: String,
}

impl Candidate {
    pub fn new(field: impl Into<String>, email: impl Into<String>) -> Self {
        Self { field: field.into(), email: email.into() }
    }
}

/// Framework-specific glue around a submission type.
pub trait FormAdapter {
    type Submission;

    /// Integration toggle that enables this adapter.
    fn integration(&self) -> FormIntegration;

    /// Addresses to check. Empty values are left out.
    fn candidate_emails(&self, submission: &Self::Submission) -> Vec<Candidate>;

    /// Attach a rejection for `field` in the framework's native error shape.
    fn reject(&self, submission: &mut Self::Submission, field: &str, message: &str);
}

/// Applies the decision engine to form submissions for enabled integrations.
#[derive(Debug, Clone)]
pub struct FormGate {
    guard: EmailGuard,
    integrations: Vec<FormIntegration>,
}

impl FormGate {
    pub fn new(guard: EmailGuard, integrations: Vec<FormIntegration>) -> Self {
        Self { guard, integrations }
    }

    pub fn from_config(guard: EmailGuard, config: &AppConfig) -> Self {
        Self::new(guard, config.integrations.clone())
    }

    /// Whether submissions for `integration` are checked at all.
    ///
    /// Nothing is checked without an API key.
    pub fn is_active(&self, integration: FormIntegration) -> bool {
        self.guard.client().has_key() && self.integrations.contains(&integration)
    }

    /// Check every candidate in `submission`, rejecting blocked fields.
    ///
    /// Returns the number of rejected fields.
    pub async fn enforce<A: FormAdapter>(&self, adapter: &A, submission: &mut A::Submission) -> usize {
        let integration = adapter.integration();
        if !self.is_active(integration) {
            return 0;
        }

        let mut rejected = 0;
        for candidate in adapter.candidate_emails(submission) {
            if let Decision::Block(reason) = self.guard.check(&candidate.email).await {
                tracing::debug!("{} rejected field {}: {:?}", integration.as_str(), candidate.field, reason);
                adapter.reject(submission, &candidate.field, reason.message());
                rejected += 1;
            }
        }
        rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubTransport, client_with};
    use mailodds_core::Threshold;

    fn reject_body(email: &str) -> serde_json::Value {
        serde_json::json!({"email": email, "status": "invalid", "action": "reject"})
    }

    #[tokio::test]
    async fn test_disabled_integration_is_ignored() {
        let transport = StubTransport::new();
        let (client, _db) = client_with(&transport, "key").await;
        let gate = FormGate::new(EmailGuard::new(client, Threshold::Reject), vec![FormIntegration::Woocommerce]);

        let mut submission = WpRegistrationSubmission::new("bob", "bob@example.com");
        assert_eq!(gate.enforce(&WpRegistration, &mut submission).await, 0);
        assert!(submission.errors.is_empty());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_key_enforces_nothing() {
        let transport = StubTransport::new();
        let (client, _db) = client_with(&transport, "").await;
        let gate = FormGate::new(EmailGuard::new(client, Threshold::Reject), vec![FormIntegration::WpRegistration]);

        assert!(!gate.is_active(FormIntegration::WpRegistration));
        let mut submission = WpRegistrationSubmission::new("bob", "bob@example.com");
        assert_eq!(gate.enforce(&WpRegistration, &mut submission).await, 0);
    }

    #[tokio::test]
    async fn test_enabled_integration_rejects() {
        let transport = StubTransport::new();
        transport.reply(200, reject_body("bob@example.com"));
        let (client, _db) = client_with(&transport, "key").await;
        let gate = FormGate::new(EmailGuard::new(client, Threshold::Reject), vec![FormIntegration::WpRegistration]);

        let mut submission = WpRegistrationSubmission::new("bob", "bob@example.com");
        assert_eq!(gate.enforce(&WpRegistration, &mut submission).await, 1);
        assert_eq!(submission.errors.codes(), vec!["mailodds_invalid_email"]);
        assert!(submission.errors.messages()[0].contains("could not be verified"));
    }

    #[tokio::test]
    async fn test_fail_open_on_service_error() {
        let transport = StubTransport::new();
        transport.reply(503, serde_json::json!({"error": "maintenance"}));
        let (client, _db) = client_with(&transport, "key").await;
        let gate = FormGate::new(EmailGuard::new(client, Threshold::Caution), vec![FormIntegration::Cf7]);

        let mut submission = Cf7Submission::new("your-email").with_posted("your-email", "bob@example.com");
        assert_eq!(gate.enforce(&ContactForm7, &mut submission).await, 0);
        assert!(submission.invalid.is_empty());
        assert_eq!(transport.requests().len(), 1);
    }
}
