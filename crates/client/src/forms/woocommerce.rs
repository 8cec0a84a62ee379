//! Shop registration and checkout.

use std::collections::HashMap;

use mailodds_core::FormIntegration;

use super::wordpress::{ErrorList, INVALID_EMAIL_CODE};
use super::{Candidate, FormAdapter};

/// Checkout field holding the billing address.
pub const BILLING_EMAIL_FIELD: &str = "billing_email";

/// Error code used for checkout validation errors.
pub const CHECKOUT_ERROR_CODE: &str = "validation";

#[derive(Debug, Clone, Default)]
pub struct WooRegistrationSubmission {
    pub username: String,
    pub email: String,
    pub errors: ErrorList,
}

impl WooRegistrationSubmission {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self { username: username.into(), email: email.into(), errors: ErrorList::default() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WooCheckoutSubmission {
    /// Posted checkout fields by name.
    pub data: HashMap<String, String>,
    pub errors: ErrorList,
}

impl WooCheckoutSubmission {
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.data.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WooRegistration;

impl FormAdapter for WooRegistration {
    type Submission = WooRegistrationSubmission;

    fn integration(&self) -> FormIntegration {
        FormIntegration::Woocommerce
    }

    fn candidate_emails(&self, submission: &Self::Submission) -> Vec<Candidate> {
        if submission.email.trim().is_empty() {
            return Vec::new();
        }
        vec![Candidate::new("email", submission.email.as_str())]
    }

    fn reject(&self, submission: &mut Self::Submission, _field: &str, message: &str) {
        submission.errors.add(INVALID_EMAIL_CODE, message);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WooCheckout;

impl FormAdapter for WooCheckout {
    type Submission = WooCheckoutSubmission;

    fn integration(&self) -> FormIntegration {
        FormIntegration::Woocommerce
    }

    fn candidate_emails(&self, submission: &Self::Submission) -> Vec<Candidate> {
        submission
            .data
            .get(BILLING_EMAIL_FIELD)
            .filter(|email| !email.trim().is_empty())
            .map(|email| vec![Candidate::new(BILLING_EMAIL_FIELD, email.as_str())])
            .unwrap_or_default()
    }

    fn reject(&self, submission: &mut Self::Submission, _field: &str, message: &str) {
        submission.errors.add(CHECKOUT_ERROR_CODE, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_candidates() {
        let submission = WooRegistrationSubmission::new("shopper", "shopper@example.com");
        assert_eq!(WooRegistration.candidate_emails(&submission), vec![Candidate::new("email", "shopper@example.com")]);
        assert_eq!(WooRegistration.integration(), FormIntegration::Woocommerce);
    }

    #[test]
    fn test_checkout_uses_billing_email_only() {
        let submission = WooCheckoutSubmission::default()
            .with_field("billing_email", "buyer@example.com")
            .with_field("shipping_email", "other@example.com");
        assert_eq!(WooCheckout.candidate_emails(&submission), vec![Candidate::new("billing_email", "buyer@example.com")]);

        let missing = WooCheckoutSubmission::default().with_field("billing_first_name", "Sam");
        assert!(WooCheckout.candidate_emails(&missing).is_empty());
    }

    #[test]
    fn test_checkout_reject_code() {
        let mut submission = WooCheckoutSubmission::default().with_field("billing_email", "buyer@example.com");
        WooCheckout.reject(&mut submission, BILLING_EMAIL_FIELD, "blocked");
        assert_eq!(submission.errors.codes(), vec![CHECKOUT_ERROR_CODE]);
    }
}
