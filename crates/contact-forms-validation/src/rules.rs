//! The rule table: tags, predicates and failure messages.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{has_message_length, is_present, is_valid_email, is_valid_name, is_valid_phone};

/// Identifies one validation rule.
///
/// The declaration order is the evaluation order: when several rules apply
/// to one field they are always checked in this order, whatever order the
/// field binding lists them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleTag {
    Required,
    Email,
    Phone,
    Name,
    MessageLength,
}

impl RuleTag {
    /// Every tag, in evaluation order.
    pub const ALL: [RuleTag; 5] = [
        RuleTag::Required,
        RuleTag::Email,
        RuleTag::Phone,
        RuleTag::Name,
        RuleTag::MessageLength,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTag::Required => "required",
            RuleTag::Email => "email",
            RuleTag::Phone => "phone",
            RuleTag::Name => "name",
            RuleTag::MessageLength => "message-length",
        }
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown validation rule '{0}'")]
pub struct UnknownRuleTag(pub String);

impl FromStr for RuleTag {
    type Err = UnknownRuleTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownRuleTag(s.to_string()))
    }
}

/// A named predicate plus its user-facing failure message.
#[derive(Clone, Copy)]
pub struct ValidationRule {
    pub tag: RuleTag,
    pub predicate: fn(&str) -> bool,
    pub message: &'static str,
}

impl ValidationRule {
    pub fn check(&self, value: &str) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("tag", &self.tag)
            .field("message", &self.message)
            .finish()
    }
}

/// The first rule a value failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    pub tag: RuleTag,
    pub message: &'static str,
}

/// Immutable tag → rule lookup, built once at startup.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: HashMap<RuleTag, ValidationRule>,
}

impl RuleSet {
    /// The contact form's rule table.
    pub fn standard() -> Self {
        let table = [
            ValidationRule {
                tag: RuleTag::Required,
                predicate: is_present,
                message: "This field is required",
            },
            ValidationRule {
                tag: RuleTag::Email,
                predicate: is_valid_email,
                message: "Please enter a valid email address",
            },
            ValidationRule {
                tag: RuleTag::Phone,
                predicate: is_valid_phone,
                message: "Please enter a valid phone number",
            },
            ValidationRule {
                tag: RuleTag::Name,
                predicate: is_valid_name,
                message: "Please enter a valid name (letters only, minimum 2 characters)",
            },
            ValidationRule {
                tag: RuleTag::MessageLength,
                predicate: has_message_length,
                message: "Please provide at least 10 characters for your message",
            },
        ];

        Self {
            rules: table.into_iter().map(|rule| (rule.tag, rule)).collect(),
        }
    }

    pub fn get(&self, tag: RuleTag) -> &ValidationRule {
        // standard() registers every tag
        &self.rules[&tag]
    }

    /// Evaluates the given rules against `value`, stopping at the first failure.
    ///
    /// Rules run in [`RuleTag`] order regardless of the order of `tags`.
    /// A blank value is judged by `required` alone: format rules are skipped
    /// so optional fields can be left empty.
    pub fn evaluate(&self, tags: &[RuleTag], value: &str) -> Result<(), RuleFailure> {
        let mut ordered = tags.to_vec();
        ordered.sort();
        ordered.dedup();

        let blank = !is_present(value);

        for tag in ordered {
            if blank && tag != RuleTag::Required {
                continue;
            }
            let rule = self.get(tag);
            if !rule.check(value) {
                return Err(RuleFailure {
                    tag,
                    message: rule.message,
                });
            }
        }

        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(RuleTag::Required, "   ", false)]
    #[case(RuleTag::Required, " x ", true)]
    #[case(RuleTag::Email, "not-an-email", false)]
    #[case(RuleTag::Email, "a@b.co", true)]
    #[case(RuleTag::Phone, "555-1234", false)]
    #[case(RuleTag::Phone, "(555) 123-4567", true)]
    #[case(RuleTag::Name, "A", false)]
    #[case(RuleTag::Name, "Ada Lovelace", true)]
    #[case(RuleTag::MessageLength, "short", false)]
    #[case(RuleTag::MessageLength, "Two storey extension", true)]
    fn test_predicate_table(#[case] tag: RuleTag, #[case] value: &str, #[case] expected: bool) {
        assert_eq!(RuleSet::standard().get(tag).check(value), expected);
    }

    #[test]
    fn test_required_checked_before_name() {
        let failure = RuleSet::standard()
            .evaluate(&[RuleTag::Name, RuleTag::Required], "")
            .unwrap_err();
        assert_eq!(failure.tag, RuleTag::Required);
        assert_eq!(failure.message, "This field is required");
    }

    #[test]
    fn test_short_circuits_on_first_failure() {
        // fails both email and name, only email is reported
        let failure = RuleSet::standard()
            .evaluate(&[RuleTag::Name, RuleTag::Email], "x1")
            .unwrap_err();
        assert_eq!(failure.tag, RuleTag::Email);
    }

    #[test]
    fn test_phone_failure_message() {
        let failure = RuleSet::standard()
            .evaluate(&[RuleTag::Phone], "555-1234")
            .unwrap_err();
        assert_eq!(failure.message, "Please enter a valid phone number");
    }

    #[test]
    fn test_blank_optional_field_passes() {
        let rules = RuleSet::standard();
        assert!(rules.evaluate(&[RuleTag::Phone], "").is_ok());
        assert!(rules.evaluate(&[RuleTag::Email], "  ").is_ok());
    }

    #[test]
    fn test_no_rules_always_passes() {
        assert!(RuleSet::standard().evaluate(&[], "anything").is_ok());
    }

    #[test]
    fn test_tag_names_round_trip_through_serde_and_from_str() {
        for tag in RuleTag::ALL {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
            assert_eq!(tag.as_str().parse::<RuleTag>().unwrap(), tag);
        }
        assert_eq!(
            "zip-code".parse::<RuleTag>(),
            Err(UnknownRuleTag("zip-code".to_string()))
        );
    }
}
