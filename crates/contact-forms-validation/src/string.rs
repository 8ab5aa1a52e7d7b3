//! String validation functions

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum length of a name, spaces included.
pub const MIN_NAME_LENGTH: usize = 2;

/// Minimum trimmed length of the free-text message.
pub const MIN_MESSAGE_LENGTH: usize = 10;

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?-u)^[A-Za-z\s]+$").unwrap());

/// True when the value is non-empty after trimming.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// ASCII letters and whitespace only, at least [`MIN_NAME_LENGTH`] characters.
pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_LENGTH && NAME_REGEX.is_match(name)
}

/// At least [`MIN_MESSAGE_LENGTH`] characters once trimmed.
pub fn has_message_length(message: &str) -> bool {
    message.trim().chars().count() >= MIN_MESSAGE_LENGTH
}
