//! Sensitive data redaction — masks credentials and card-like numbers
//! in chat messages before they are sent to the hosted LLM.
//!
//! Rules run in a fixed order. The replacement tokens never match a
//! rule again, so redacting twice gives the same text as redacting once.

use regex::Regex;
use std::sync::LazyLock;

pub struct RedactionResult {
    pub cleaned_text: String,
    pub redactions: Vec<Redaction>,
    pub has_redactions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    pub label: &'static str,
    pub count: usize,
}

/// (pattern, replacement, label), applied top to bottom.
static REDACTION_RULES: LazyLock<Vec<(Regex, &'static str, &'static str)>> =
    LazyLock::new(|| {
        vec![
            (
                Regex::new(r"(?i)user\s*=\s*\S+").unwrap(),
                "user=***",
                "username",
            ),
            (
                Regex::new(r"(?i)pass\s*=\s*\S+").unwrap(),
                "pass=***",
                "password",
            ),
            // Card numbers and other long account numbers
            (Regex::new(r"\b\d{12,19}\b").unwrap(), "****", "long_number"),
        ]
    });

/// Redact `text` and report how many matches each rule replaced.
///
/// Pure: nothing is logged here, the caller decides what to do with
/// the summary.
pub fn redact_sensitive_data(text: &str) -> RedactionResult {
    let mut cleaned = text.to_string();
    let mut redactions = Vec::new();

    for (pattern, replacement, label) in REDACTION_RULES.iter() {
        let count = pattern.find_iter(&cleaned).count();
        if count > 0 {
            redactions.push(Redaction {
                label: *label,
                count,
            });
            // NoExpand: the replacement is literal text, `$` is not a group reference.
            cleaned = pattern
                .replace_all(&cleaned, regex::NoExpand(*replacement))
                .into_owned();
        }
    }

    let has_redactions = !redactions.is_empty();

    RedactionResult {
        cleaned_text: cleaned,
        redactions,
        has_redactions,
    }
}

/// Redacted copy of `text`, safe to forward to an external service.
pub fn redact_message(text: &str) -> String {
    redact_sensitive_data(text).cleaned_text
}

impl RedactionResult {
    /// Human-readable summary such as `"1 username, 2 long_number"`.
    pub fn summary(&self) -> String {
        self.redactions
            .iter()
            .map(|r| format!("{} {}", r.count, r.label))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
