//! Contact Form 7 email tags.

use std::collections::HashMap;

use mailodds_core::FormIntegration;

use super::{Candidate, FormAdapter};
use crate::api::sanitize_email;

/// One email tag's validation pass over the posted form.
#[derive(Debug, Clone, Default)]
pub struct Cf7Submission {
    /// Name of the email tag being validated.
    pub tag: String,
    /// Posted form values by name.
    pub posted: HashMap<String, String>,
    /// `(tag, message)` pairs for invalidated tags.
    pub invalid: Vec<(String, String)>,
}

impl Cf7Submission {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Default::default() }
    }

    pub fn with_posted(mut self, name: &str, value: &str) -> Self {
        self.posted.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContactForm7;

impl FormAdapter for ContactForm7 {
    type Submission = Cf7Submission;

    fn integration(&self) -> FormIntegration {
        FormIntegration::Cf7
    }

    fn candidate_emails(&self, submission: &Self::Submission) -> Vec<Candidate> {
        submission
            .posted
            .get(&submission.tag)
            .and_then(|raw| sanitize_email(raw))
            .map(|email| vec![Candidate::new(submission.tag.as_str(), email)])
            .unwrap_or_default()
    }

    fn reject(&self, submission: &mut Self::Submission, field: &str, message: &str) {
        submission.invalid.push((field.to_string(), message.to_string()));
    }
}
