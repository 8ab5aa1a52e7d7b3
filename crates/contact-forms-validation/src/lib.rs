//! Contact form validation
//!
//! The fixed table of validation rules used by the contact form. Each rule
//! pairs a tag with a pure predicate and a user-facing failure message.
//! The same table backs the form controller and the WASM bindings, so the
//! browser and the native code agree on what a valid field is.
//!
//! ```
//! use contact_forms_validation::{RuleSet, RuleTag};
//!
//! let rules = RuleSet::standard();
//! let failure = rules
//!     .evaluate(&[RuleTag::Name, RuleTag::Required], "")
//!     .unwrap_err();
//! assert_eq!(failure.message, "This field is required");
//! ```

pub mod email;
pub mod phone;
pub mod rules;
pub mod string;

pub use email::is_valid_email;
pub use phone::is_valid_phone;
pub use rules::{RuleFailure, RuleSet, RuleTag, UnknownRuleTag, ValidationRule};
pub use string::{has_message_length, is_present, is_valid_name, MIN_MESSAGE_LENGTH, MIN_NAME_LENGTH};
