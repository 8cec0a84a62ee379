//! WPForms submissions.

use std::collections::{BTreeMap, HashMap};

use mailodds_core::FormIntegration;

use super::{Candidate, FormAdapter};

/// A field definition from the form configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WpFormsField {
    pub id: String,
    /// Field type, e.g. `email`, `text`.
    pub kind: String,
}

impl WpFormsField {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self { id: id.into(), kind: kind.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WpFormsSubmission {
    pub form_id: u64,
    pub fields: Vec<WpFormsField>,
    /// Submitted values by field id.
    pub entry: HashMap<String, String>,
    /// Errors by field id.
    pub errors: BTreeMap<String, String>,
}

impl WpFormsSubmission {
    pub fn new(form_id: u64) -> Self {
        Self { form_id, ..Default::default() }
    }

    pub fn with_field(mut self, id: &str, kind: &str, value: &str) -> Self {
        self.fields.push(WpFormsField::new(id, kind));
        self.entry.insert(id.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WpForms;

impl FormAdapter for WpForms {
    type Submission = WpFormsSubmission;

    fn integration(&self) -> FormIntegration {
        FormIntegration::Wpforms
    }

    fn candidate_emails(&self, submission: &Self::Submission) -> Vec<Candidate> {
        submission
            .fields
            .iter()
            .filter(|field| field.kind == "email")
            .filter_map(|field| {
                let value = submission.entry.get(&field.id)?;
                (!value.trim().is_empty()).then(|| Candidate::new(field.id.as_str(), value.as_str()))
            })
            .collect()
    }

    fn reject(&self, submission: &mut Self::Submission, field: &str, message: &str) {
        submission.errors.insert(field.to_string(), message.to_string());
    }
}
