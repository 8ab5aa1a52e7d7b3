// File: src/view.rs
// Purpose: The page-markup seam the controller renders into

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Visual cue on a field after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldCue {
    #[default]
    None,
    /// Failed validation (the "shake"), cleared after a short delay
    Invalid,
    /// Passed validation, cleared after a short delay
    Success,
}

/// What the controller needs from the form's markup.
///
/// Implementations own the actual elements: inputs, the per-field error
/// text, the submit control with its label and loading indicator, the
/// success message and the shared banner (created on first use).
///
/// The controller calls these methods while holding its state lock. They
/// must not call back into the controller synchronously; an element event
/// fired from inside a render call (a programmatic `focus()`, say) has to be
/// queued and dispatched afterwards. [`FormHooks`](crate::FormHooks) run
/// after the lock is released and may use the controller freely.
pub trait FormView: Send + Sync {
    /// Current value of a field, empty if the field is unknown.
    fn field_value(&self, field: &str) -> String;

    fn show_field_error(&self, field: &str, message: &str);

    fn clear_field_error(&self, field: &str);

    fn set_field_cue(&self, field: &str, cue: FieldCue);

    /// Disable the submit control and show its loading indicator, or revert.
    fn set_submitting(&self, submitting: bool);

    /// Show the banner with `message`, replacing any current text.
    fn show_banner(&self, message: &str);

    fn hide_banner(&self);

    fn set_success_visible(&self, visible: bool);

    /// Clear every field value.
    fn reset_fields(&self);
}

/// Everything a [`MemoryView`] currently displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryViewState {
    pub values: HashMap<String, String>,
    pub errors: HashMap<String, String>,
    pub cues: HashMap<String, FieldCue>,
    pub submitting: bool,
    pub banner: Option<String>,
    /// Whether the banner element exists yet
    pub banner_created: bool,
    pub success_visible: bool,
}

/// Headless [`FormView`] keeping the rendered state in memory.
#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<MemoryViewState>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view with initial field values
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let view = Self::new();
        view.lock().values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        view
    }

    fn lock(&self) -> MutexGuard<'_, MemoryViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate the user typing into a field
    pub fn set_value(&self, field: &str, value: &str) {
        self.lock().values.insert(field.to_string(), value.to_string());
    }

    pub fn snapshot(&self) -> MemoryViewState {
        self.lock().clone()
    }

    pub fn value(&self, field: &str) -> String {
        self.field_value(field)
    }

    pub fn error(&self, field: &str) -> Option<String> {
        self.lock().errors.get(field).cloned()
    }

    pub fn cue(&self, field: &str) -> FieldCue {
        self.lock().cues.get(field).copied().unwrap_or_default()
    }

    pub fn banner(&self) -> Option<String> {
        self.lock().banner.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    pub fn is_success_visible(&self) -> bool {
        self.lock().success_visible
    }
}

impl FormView for MemoryView {
    fn field_value(&self, field: &str) -> String {
        self.lock().values.get(field).cloned().unwrap_or_default()
    }

    fn show_field_error(&self, field: &str, message: &str) {
        self.lock().errors.insert(field.to_string(), message.to_string());
    }

    fn clear_field_error(&self, field: &str) {
        self.lock().errors.remove(field);
    }

    fn set_field_cue(&self, field: &str, cue: FieldCue) {
        let mut state = self.lock();
        match cue {
            FieldCue::None => state.cues.remove(field),
            cue => state.cues.insert(field.to_string(), cue),
        };
    }

    fn set_submitting(&self, submitting: bool) {
        self.lock().submitting = submitting;
    }

    fn show_banner(&self, message: &str) {
        let mut state = self.lock();
        state.banner_created = true;
        state.banner = Some(message.to_string());
    }

    fn hide_banner(&self) {
        self.lock().banner = None;
    }

    fn set_success_visible(&self, visible: bool) {
        self.lock().success_visible = visible;
    }

    fn reset_fields(&self) {
        for value in self.lock().values.values_mut() {
            value.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_is_created_lazily_and_reused() {
        let view = MemoryView::new();
        assert!(!view.snapshot().banner_created);

        view.show_banner("first");
        view.show_banner("second");
        assert_eq!(view.banner().as_deref(), Some("second"));

        view.hide_banner();
        let state = view.snapshot();
        assert!(state.banner_created);
        assert!(state.banner.is_none());
    }

    #[test]
    fn test_reset_clears_values_but_keeps_fields() {
        let view = MemoryView::with_values([("name", "Ada"), ("email", "ada@example.com")]);
        view.reset_fields();
        assert_eq!(view.value("name"), "");
        assert_eq!(view.snapshot().values.len(), 2);
    }

    #[test]
    fn test_cue_none_removes_entry() {
        let view = MemoryView::new();
        view.set_field_cue("name", FieldCue::Invalid);
        assert_eq!(view.cue("name"), FieldCue::Invalid);
        view.set_field_cue("name", FieldCue::None);
        assert!(view.snapshot().cues.is_empty());
    }
}
