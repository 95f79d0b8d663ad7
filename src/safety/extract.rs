//! Best-effort username/password extraction from free-form chat text.
//!
//! Recognises `user=<value>` and `pass=<value>` anywhere in the message.
//! The keys are not anchored to word boundaries, so `superuser=alice`
//! yields `alice` as the username.

use regex::Regex;
use std::sync::LazyLock;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)user\s*=\s*(\S+)").unwrap());

static PASSWORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)pass\s*=\s*(\S+)").unwrap());

/// Username and password found in a message. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialPair {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialPair {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

/// Pull the first `user=` and first `pass=` values out of `text`.
///
/// Matching is case-insensitive and tolerates whitespace around `=`.
/// Values are taken verbatim up to the next whitespace.
pub fn extract_credentials(text: &str) -> CredentialPair {
    CredentialPair {
        username: first_capture(&USERNAME_PATTERN, text),
        password: first_capture(&PASSWORD_PATTERN, text),
    }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_both_fields() {
        let creds = extract_credentials("user=john pass=12345");
        assert_eq!(creds.username.as_deref(), Some("john"));
        assert_eq!(creds.password.as_deref(), Some("12345"));
    }

    #[test]
    fn case_insensitive_and_whitespace_tolerant() {
        let creds = extract_credentials("USER = alice   pass=secret!");
        assert_eq!(creds.username.as_deref(), Some("alice"));
        assert_eq!(creds.password.as_deref(), Some("secret!"));
    }

    #[test]
    fn missing_fields_are_none() {
        let inputs = [
            "",
            "hello there",
            "my username is bob",
            "password: hunter2",
            "user: bob",
            "card 1234567890123456",
        ];

        for text in inputs {
            let creds = extract_credentials(text);
            assert!(creds.is_empty(), "Nothing should be extracted from '{}'", text);
        }
    }

    #[test]
    fn only_one_field_present() {
        let creds = extract_credentials("save my pass=hunter2 for github");
        assert_eq!(creds.username, None);
        assert_eq!(creds.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn first_occurrence_wins() {
        let creds = extract_credentials("user=first user=second");
        assert_eq!(creds.username.as_deref(), Some("first"));
    }

    #[test]
    fn key_is_not_word_anchored() {
        // Substring matches are accepted: "superuser=" contains "user=".
        let creds = extract_credentials("superuser=alice");
        assert_eq!(creds.username.as_deref(), Some("alice"));

        // "password=" contains "pass" followed by "word=", which is not "pass=".
        let creds = extract_credentials("password=abc");
        assert_eq!(creds.password, None);
    }

    #[test]
    fn value_stops_at_whitespace() {
        let creds = extract_credentials("user=\tbob\nnext line");
        assert_eq!(creds.username.as_deref(), Some("bob"));
    }
}
