//! Core registration form.

use mailodds_core::FormIntegration;

use super::{Candidate, FormAdapter};

/// Error code attached to registration errors.
pub const INVALID_EMAIL_CODE: &str = "mailodds_invalid_email";

/// Accumulated `(code, message)` errors, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList {
    entries: Vec<(String, String)>,
}

impl ErrorList {
    pub fn add(&mut self, code: &str, message: &str) {
        self.entries.push((code.to_string(), message.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.entries.iter().map(|(c, _)| c.as_str()).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, m)| m.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WpRegistrationSubmission {
    pub user_login: String,
    pub user_email: String,
    pub errors: ErrorList,
}

impl WpRegistrationSubmission {
    pub fn new(user_login: impl Into<String>, user_email: impl Into<String>) -> Self {
        Self { user_login: user_login.into(), user_email: user_email.into(), errors: ErrorList::default() }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WpRegistration;

impl FormAdapter for WpRegistration {
    type Submission = WpRegistrationSubmission;

    fn integration(&self) -> FormIntegration {
        FormIntegration::WpRegistration
    }

    fn candidate_emails(&self, submission: &Self::Submission) -> Vec<Candidate> {
        if submission.user_email.trim().is_empty() {
            return Vec::new();
        }
        vec![Candidate::new("user_email", submission.user_email.as_str())]
    }

    fn reject(&self, submission: &mut Self::Submission, _field: &str, message: &str) {
        submission.errors.add(INVALID_EMAIL_CODE, message);
    }
}
