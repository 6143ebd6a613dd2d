//! Contact method selection and the client-side shape checks that gate
//! sending a one-time code.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Channel the one-time code is delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
}

impl ContactMethod {
    pub fn toggled(self) -> Self {
        match self {
            Self::Email => Self::Phone,
            Self::Phone => Self::Email,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

/// A validated contact value tagged with its method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub method: ContactMethod,
    pub value: String,
}

impl Contact {
    pub fn email(value: impl Into<String>) -> Self {
        Self {
            method: ContactMethod::Email,
            value: value.into(),
        }
    }

    pub fn phone(value: impl Into<String>) -> Self {
        Self {
            method: ContactMethod::Phone,
            value: value.into(),
        }
    }
}

/// Tunable limits for contact and code validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Minimum number of digits a phone number must contain.
    pub phone_min_digits: usize,
    /// Exact length of the one-time code.
    pub code_length: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            phone_min_digits: 10,
            code_length: 6,
        }
    }
}

impl ValidationRules {
    pub fn is_valid_contact(&self, method: ContactMethod, value: &str) -> bool {
        match method {
            ContactMethod::Email => is_valid_email(value),
            ContactMethod::Phone => is_valid_phone(value, self.phone_min_digits),
        }
    }

    pub fn is_complete_code(&self, code: &str) -> bool {
        code.len() == self.code_length && code.chars().all(|ch| ch.is_ascii_digit())
    }
}

/// Loose `local@domain.tld` shape check; not RFC-complete.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

/// Accepts digits, whitespace, `+`, `-` and parentheses only, with at least
/// `min_digits` digits overall.
pub fn is_valid_phone(value: &str, min_digits: usize) -> bool {
    if value.is_empty() {
        return false;
    }

    let allowed = value
        .chars()
        .all(|ch| ch.is_ascii_digit() || ch.is_whitespace() || matches!(ch, '+' | '-' | '(' | ')'));

    allowed && value.chars().filter(char::is_ascii_digit).count() >= min_digits
}

/// Strips everything but ASCII digits and keeps at most `max_len` of them.
pub fn sanitize_code_input(raw: &str, max_len: usize) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(max_len)
        .collect()
}
