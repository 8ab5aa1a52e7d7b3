// File: src/binding.rs
// Purpose: Declarative form and field bindings

use std::fmt;

use contact_forms_validation::RuleTag;
use serde::{Deserialize, Serialize};

use crate::timers::TimerSlot;

/// Identifies a registered form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(String);

impl FormId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One field and the rules that apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,

    #[serde(default)]
    pub rules: Vec<RuleTag>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, rules: impl IntoIterator<Item = RuleTag>) -> Self {
        Self {
            name: name.into(),
            rules: rules.into_iter().collect(),
        }
    }
}

/// A form to register: its id, where it submits, and its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSpec {
    pub id: FormId,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

fn default_endpoint() -> String {
    "/api/contact".to_string()
}

impl FormSpec {
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: FormId::new(id),
            endpoint: endpoint.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field (builder style)
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = RuleTag>) -> Self {
        self.fields.push(FieldSpec::new(name, rules));
        self
    }
}

/// Result of the most recent validation run for a field.
///
/// Only `Valid` and `Invalid` are authoritative; the value may have changed
/// since the run that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    #[default]
    Unchecked,
    Valid,
    Invalid,
}

/// Runtime state of one bound field.
#[derive(Debug)]
pub(crate) struct FieldBinding {
    /// Rule tags in evaluation order, deduplicated
    pub rules: Vec<RuleTag>,
    pub validity: Validity,
    pub touched: bool,
    /// Pending debounced validation
    pub debounce: TimerSlot,
    /// Pending success-cue clear
    pub cue: TimerSlot,
}

impl FieldBinding {
    pub fn from_spec(spec: &FieldSpec) -> Self {
        let mut rules = spec.rules.clone();
        rules.sort();
        rules.dedup();

        Self {
            rules,
            validity: Validity::Unchecked,
            touched: false,
            debounce: TimerSlot::default(),
            cue: TimerSlot::default(),
        }
    }

    pub fn reset(&mut self) {
        self.validity = Validity::Unchecked;
        self.touched = false;
        self.debounce.cancel();
        self.cue.cancel();
    }
}
