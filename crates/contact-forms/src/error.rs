// File: src/error.rs
// Purpose: Error types for registration and submission

use std::time::Duration;

use thiserror::Error;

use crate::binding::FormId;

/// Banner text when a submit is blocked by invalid fields.
pub const REJECTED_MESSAGE: &str = "Please correct the errors above before submitting.";

/// Banner text for transport failures that carry no server message.
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Why a submission that reached the transport did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The server answered with a non-success status or `success: false`.
    #[error("{message}")]
    Declined { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl SubmissionError {
    /// Text shown in the form's banner.
    pub fn banner_message(&self) -> String {
        match self {
            SubmissionError::Declined { message, .. } => message.clone(),
            SubmissionError::Network(_) | SubmissionError::Timeout(_) => NETWORK_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("form '{0}' is already registered")]
    DuplicateForm(FormId),

    #[error("form '{form}' declares field '{field}' more than once")]
    DuplicateField { form: FormId, field: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_messages() {
        let declined = SubmissionError::Declined {
            status: 400,
            message: "Missing: service".to_string(),
        };
        assert_eq!(declined.banner_message(), "Missing: service");
        assert_eq!(
            SubmissionError::Timeout(Duration::from_secs(10)).banner_message(),
            NETWORK_MESSAGE
        );
        assert_eq!(
            SubmissionError::Network("connection refused".into()).banner_message(),
            NETWORK_MESSAGE
        );
    }
}
