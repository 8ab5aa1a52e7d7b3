//! Email validation

use once_cell::sync::Lazy;
use regex::Regex;

// local@domain.tld, no whitespace and a single '@'
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Validates the basic `local@domain` shape.
///
/// This is deliberately loose: one `@`, no whitespace and a dot somewhere
/// in the domain part. Deliverability is the mail server's problem.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
