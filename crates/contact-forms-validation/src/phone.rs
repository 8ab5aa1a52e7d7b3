//! Phone number validation

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum number of digits in an accepted phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?-u)^\+?[\d\s\-()]+$").unwrap());

/// Validates a phone number.
///
/// Accepts an optional leading `+` followed by digits, spaces, hyphens and
/// parentheses, with at least [`MIN_PHONE_DIGITS`] digits overall. Digits and
/// spaces are ASCII only.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
        && phone.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5551234567")]
    #[case("555-123-4567")]
    #[case("(555) 123-4567")]
    #[case("+1 555 123 4567")]
    #[case("+44 (0) 20 7946 0958")]
    fn test_valid_phones(#[case] phone: &str) {
        assert!(is_valid_phone(phone), "{phone} should be accepted");
    }

    #[rstest]
    #[case("")]
    #[case("555-1234")]
    #[case("555.123.4567")]
    #[case("++15551234567")]
    #[case("555 123 456x")]
    #[case("1-800-FLOWERS")]
    fn test_invalid_phones(#[case] phone: &str) {
        assert!(!is_valid_phone(phone), "{phone} should be rejected");
    }

    #[rstest]
    #[case("555 123 4567 ٧")]
    #[case("555\u{2003}123\u{2003}4567")]
    #[case("+1\u{00a0}555 123 4567")]
    fn test_non_ascii_digits_and_spaces_rejected(#[case] phone: &str) {
        assert!(!is_valid_phone(phone), "{phone:?} should be rejected");
    }
}
