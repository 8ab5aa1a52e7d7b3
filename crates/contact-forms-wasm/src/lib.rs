//! Contact Forms WASM
//!
//! WebAssembly bindings for the contact form rule table.
//! Page scripts validate with exactly the predicates and messages the
//! form controller uses.

use contact_forms_validation::{RuleSet, RuleTag};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validation error returned to JavaScript
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Parse rule tags, failing on the first unknown one
fn parse_tags(tags: &[String]) -> Result<Vec<RuleTag>, String> {
    tags.iter()
        .map(|tag| tag.parse::<RuleTag>().map_err(|e| e.to_string()))
        .collect()
}

/// First failing rule for `value`, if any
fn first_error(field_name: &str, value: &str, tags: &[RuleTag]) -> Option<ValidationError> {
    RuleSet::standard()
        .evaluate(tags, value)
        .err()
        .map(|failure| ValidationError {
            field: field_name.to_string(),
            message: failure.message.to_string(),
        })
}

/// Validate a single field value
///
/// # Arguments
/// * `field_name` - Name of the field being validated
/// * `value` - The value to validate
/// * `rules` - Array of rule tags, e.g. `["required", "email"]`
///
/// # Returns
/// Array with at most one validation error (empty if valid)
///
/// # Example (JavaScript)
/// ```javascript
/// const errors = validateField('email', 'user@example.com', ['required', 'email']);
/// ```
#[wasm_bindgen(js_name = validateField)]
pub fn validate_field(field_name: &str, value: &str, rules: JsValue) -> Result<JsValue, JsValue> {
    let tags: Vec<String> = serde_wasm_bindgen::from_value(rules)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse rules: {}", e)))?;
    let tags = parse_tags(&tags).map_err(|e| JsValue::from_str(&e))?;

    let errors: Vec<ValidationError> = first_error(field_name, value, &tags).into_iter().collect();
    Ok(serde_wasm_bindgen::to_value(&errors)?)
}

/// Quick email validation
#[wasm_bindgen(js_name = isValidEmail)]
pub fn is_valid_email_js(email: &str) -> bool {
    contact_forms_validation::is_valid_email(email)
}

/// Quick phone validation
#[wasm_bindgen(js_name = isValidPhone)]
pub fn is_valid_phone_js(phone: &str) -> bool {
    contact_forms_validation::is_valid_phone(phone)
}

/// Quick name validation
#[wasm_bindgen(js_name = isValidName)]
pub fn is_valid_name_js(name: &str) -> bool {
    contact_forms_validation::is_valid_name(name)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_validate_field_from_js_values() {
        let rules = serde_wasm_bindgen::to_value(&vec!["required", "phone"]).unwrap();
        let errors = validate_field("phone", "555-1234", rules).unwrap();
        let errors: Vec<ValidationError> = serde_wasm_bindgen::from_value(errors).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Please enter a valid phone number");
    }
}
