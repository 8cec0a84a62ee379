//! Gravity Forms per-field validation.

use mailodds_core::FormIntegration;

use super::{Candidate, FormAdapter};

/// A submitted value; multi-input fields carry several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    /// The address to check: the value itself, or the first input.
    pub fn primary(&self) -> Option<&str> {
        match self {
            FieldValue::Single(v) => Some(v.as_str()),
            FieldValue::Multiple(values) => values.first().map(String::as_str),
        }
    }
}

/// One field's validation state as handed over by the form.
#[derive(Debug, Clone)]
pub struct GravityFieldValidation {
    pub field_type: String,
    pub value: FieldValue,
    /// Outcome of the form's own validation so far.
    pub is_valid: bool,
    pub message: Option<String>,
}

impl GravityFieldValidation {
    pub fn email(value: FieldValue) -> Self {
        Self { field_type: "email".to_string(), value, is_valid: true, message: None }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GravityForms;

impl FormAdapter for GravityForms {
    type Submission = GravityFieldValidation;

    fn integration(&self) -> FormIntegration {
        FormIntegration::GravityForms
    }

    fn candidate_emails(&self, submission: &Self::Submission) -> Vec<Candidate> {
        // Fields that already failed keep their own message.
        if submission.field_type != "email" || !submission.is_valid {
            return Vec::new();
        }
        match submission.value.primary() {
            Some(email) if !email.trim().is_empty() => vec![Candidate::new("value", email)],
            _ => Vec::new(),
        }
    }

    fn reject(&self, submission: &mut Self::Submission, _field: &str, message: &str) {
        submission.is_valid = false;
        submission.message = Some(message.to_string());
    }
}
