//! Request types, request-body rules, and email sanitization.

use std::collections::HashSet;
use std::sync::LazyLock;

use mailodds_core::Depth;
use regex::Regex;
use serde::Serialize;

/// Runs of two or more dots in a domain are dropped entirely.
static DOT_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());

/// Characters kept in the local part.
const LOCAL_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~.-";

/// Shortest address accepted, e.g. `a@b.co`.
const MIN_EMAIL_LEN: usize = 6;

/// Per-call overrides for a validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Depth override; falls back to the client's configured depth.
    pub depth: Option<Depth>,
    /// Policy override; falls back to the client's configured policy. 0 means none.
    pub policy_id: Option<u32>,
    /// Bypass cache reads and writes. Ignored by batch validation, which never reads the cache.
    pub skip_cache: bool,
}

impl ValidateOptions {
    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_policy(mut self, policy_id: u32) -> Self {
        self.policy_id = Some(policy_id);
        self
    }

    pub fn skip_cache(mut self) -> Self {
        self.skip_cache = true;
        self
    }
}

/// Body of `POST /v1/validate`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateBody<'a> {
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<Depth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<u32>,
}

impl<'a> ValidateBody<'a> {
    pub fn new(email: &'a str, depth: Depth, policy_id: u32) -> Self {
        Self { email, depth: wire_depth(depth), policy_id: wire_policy(policy_id) }
    }
}

/// Body of `POST /v1/validate/batch`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchBody<'a> {
    pub emails: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<Depth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<u32>,
}

impl<'a> BatchBody<'a> {
    pub fn new(emails: &'a [String], depth: Depth, policy_id: u32) -> Self {
        Self { emails, depth: wire_depth(depth), policy_id: wire_policy(policy_id) }
    }
}

/// `enhanced` is the service default and is never sent.
fn wire_depth(depth: Depth) -> Option<Depth> {
    (depth == Depth::Standard).then_some(depth)
}

fn wire_policy(policy_id: u32) -> Option<u32> {
    (policy_id > 0).then_some(policy_id)
}

/// Sanitize an email address, returning `None` when nothing usable remains.
///
/// Trims, strips characters that are not allowed in the local part or in
/// domain labels, and requires a dotted domain with at least two labels.
pub fn sanitize_email(raw: &str) -> Option<String> {
    let email = raw.trim();
    if email.len() < MIN_EMAIL_LEN {
        return None;
    }

    // split on the first '@', which must not lead
    let at = email.find('@')?;
    if at == 0 {
        return None;
    }
    let local = &email[..at];
    let domain = &email[at + 1..];

    let local: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || LOCAL_SPECIALS.contains(*c))
        .collect();
    if local.is_empty() {
        return None;
    }

    let domain = DOT_RUNS.replace_all(domain, "");
    let domain = domain.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let labels: Vec<String> = domain
        .split('.')
        .map(|label| {
            label
                .trim_matches(|c: char| c == '-' || c.is_whitespace())
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .filter(|label| !label.is_empty())
        .collect();
    if labels.len() < 2 {
        return None;
    }

    Some(format!("{local}@{}", labels.join(".")))
}

/// Sanitize a list, dropping unusable entries and case-insensitive duplicates.
///
/// First occurrence wins; order is preserved.
pub fn sanitize_batch<I, S>(emails: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    emails
        .into_iter()
        .filter_map(|e| sanitize_email(e.as_ref()))
        .filter(|e| seen.insert(e.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_accepts_plain_address() {
        assert_eq!(sanitize_email("user@example.com").as_deref(), Some("user@example.com"));
        assert_eq!(sanitize_email("  first.last+tag@mail.example.co.uk \n").as_deref(), Some("first.last+tag@mail.example.co.uk"));
    }

    #[test]
    fn test_sanitize_rejects_garbage() {
        assert!(sanitize_email("").is_none());
        assert!(sanitize_email("a@b.c").is_none()); // too short
        assert!(sanitize_email("no-at-sign.example.com").is_none());
        assert!(sanitize_email("@example.com").is_none());
        assert!(sanitize_email("user@localhost").is_none());
        assert!(sanitize_email("()@example.com").is_none());
    }

    #[test]
    fn test_sanitize_strips_invalid_characters() {
        assert_eq!(sanitize_email("us(er)@exa_mple.com").as_deref(), Some("user@example.com"));
        assert_eq!(sanitize_email("user@-example-.com").as_deref(), Some("user@example.com"));
        assert_eq!(sanitize_email("user@.example.com.").as_deref(), Some("user@example.com"));
    }

    #[test]
    fn test_sanitize_splits_on_first_at() {
        assert!(sanitize_email("@a@example.com").is_none());
        assert_eq!(sanitize_email("a@b@example.com").as_deref(), Some("a@bexample.com"));
    }

    #[test]
    fn test_sanitize_preserves_case() {
        assert_eq!(sanitize_email("User@Example.COM").as_deref(), Some("User@Example.COM"));
    }

    #[test]
    fn test_sanitize_non_ascii_first_char() {
        assert!(sanitize_email("é@example.com").is_none());
    }

    #[test]
    fn test_sanitize_batch_filters_and_dedupes() {
        let emails = vec!["a@example.com", "not-an-email", "A@Example.com", "b@example.com", ""];
        assert_eq!(sanitize_batch(emails), vec!["a@example.com".to_string(), "b@example.com".to_string()]);
    }

    #[test]
    fn test_enhanced_depth_omitted() {
        let body = serde_json::to_value(ValidateBody::new("a@example.com", Depth::Enhanced, 0)).unwrap();
        assert_eq!(body, serde_json::json!({"email": "a@example.com"}));
    }

    #[test]
    fn test_standard_depth_and_policy_sent() {
        let body = serde_json::to_value(ValidateBody::new("a@example.com", Depth::Standard, 12)).unwrap();
        assert_eq!(body, serde_json::json!({"email": "a@example.com", "depth": "standard", "policy_id": 12}));
    }

    #[test]
    fn test_batch_body_rules() {
        let emails = vec!["a@example.com".to_string(), "b@example.com".to_string()];
        let body = serde_json::to_value(BatchBody::new(&emails, Depth::Enhanced, 0)).unwrap();
        assert_eq!(body, serde_json::json!({"emails": ["a@example.com", "b@example.com"]}));

        let body = serde_json::to_value(BatchBody::new(&emails, Depth::Standard, 3)).unwrap();
        assert_eq!(body["depth"], "standard");
        assert_eq!(body["policy_id"], 3);
    }

    #[test]
    fn test_options_builders() {
        let opts = ValidateOptions::default().with_depth(Depth::Standard).with_policy(4).skip_cache();
        assert_eq!(opts.depth, Some(Depth::Standard));
        assert_eq!(opts.policy_id, Some(4));
        assert!(opts.skip_cache);
    }
}
