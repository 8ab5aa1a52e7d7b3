// File: src/controller.rs
// Purpose: Form registration, field validation and the submission lifecycle

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contact_forms_validation::RuleSet;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::binding::{FieldBinding, FormId, FormSpec, Validity};
use crate::config::ControllerConfig;
use crate::error::{RegistrationError, SubmissionError, REJECTED_MESSAGE};
use crate::response;
use crate::timers::TimerSlot;
use crate::transport::ContactTransport;
use crate::view::{FieldCue, FormView};

/// Called with the parsed response body after a successful submission.
pub type SuccessHook = Arc<dyn Fn(&FormId, &Map<String, Value>) + Send + Sync>;

/// Called after a failed submission (not for client-side rejections).
pub type ErrorHook = Arc<dyn Fn(&FormId, &SubmissionError) + Send + Sync>;

/// Optional callbacks for one form.
#[derive(Clone, Default)]
pub struct FormHooks {
    on_success: Option<SuccessHook>,
    on_error: Option<ErrorHook>,
}

impl FormHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FormId, &Map<String, Value>) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FormId, &SubmissionError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }
}

/// Where a form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Controller-wide submission token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight(FormId),
}

/// Result of [`FormSubmissionController::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Another submission was in flight, or the form is not registered
    Dropped,
    /// The endpoint accepted the submission; carries the parsed body
    Delivered(Map<String, Value>),
    /// Blocked by client-side validation; nothing was sent
    Rejected { invalid_fields: Vec<String> },
    Failed(SubmissionError),
}

impl SubmitOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SubmitOutcome::Delivered(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected { .. })
    }
}

/// One managed form.
struct FormRegistration {
    endpoint: String,
    fields: HashMap<String, FieldBinding>,
    view: Arc<dyn FormView>,
    hooks: FormHooks,
    phase: Phase,
    banner_timer: TimerSlot,
    success_timer: TimerSlot,
}

impl FormRegistration {
    fn validate_field(&mut self, field: &str, rules: &RuleSet, config: &ControllerConfig) -> bool {
        let Some(binding) = self.fields.get_mut(field) else {
            warn!("Validation requested for unbound field '{}'", field);
            return false;
        };

        let value = self.view.field_value(field);
        self.view.clear_field_error(field);
        binding.cue.cancel();

        match rules.evaluate(&binding.rules, &value) {
            Err(failure) => {
                debug!("Field '{}' failed rule '{}'", field, failure.tag);
                binding.validity = Validity::Invalid;
                self.view.show_field_error(field, failure.message);
                self.view.set_field_cue(field, FieldCue::Invalid);

                let view = Arc::clone(&self.view);
                let name = field.to_string();
                binding.cue.arm(config.invalid_cue(), move || {
                    view.set_field_cue(&name, FieldCue::None);
                });
                false
            }
            Ok(()) => {
                debug!("Field '{}' is valid", field);
                binding.validity = Validity::Valid;
                self.view.set_field_cue(field, FieldCue::Success);

                let view = Arc::clone(&self.view);
                let name = field.to_string();
                binding.cue.arm(config.success_cue(), move || {
                    view.set_field_cue(&name, FieldCue::None);
                });
                true
            }
        }
    }

    /// Validates every field, no short-circuit across fields
    fn validate_form(&mut self, rules: &RuleSet, config: &ControllerConfig) -> bool {
        let names: Vec<String> = self.fields.keys().cloned().collect();
        names
            .iter()
            .fold(true, |all_valid, name| self.validate_field(name, rules, config) && all_valid)
    }

    fn invalid_fields(&self) -> Vec<String> {
        let mut invalid: Vec<String> = self
            .fields
            .iter()
            .filter(|(_, binding)| binding.validity == Validity::Invalid)
            .map(|(name, _)| name.clone())
            .collect();
        invalid.sort();
        invalid
    }

    fn collect_values(&self) -> Map<String, Value> {
        self.fields
            .keys()
            .map(|name| (name.clone(), Value::String(self.view.field_value(name))))
            .collect()
    }

    /// Setting the banner always restarts its hide timer
    fn show_banner(&mut self, message: &str, config: &ControllerConfig) {
        self.view.show_banner(message);
        let view = Arc::clone(&self.view);
        self.banner_timer.arm(config.banner_hide(), move || view.hide_banner());
    }

    fn show_success(&mut self, config: &ControllerConfig) {
        self.view.set_success_visible(true);
        let view = Arc::clone(&self.view);
        self.success_timer
            .arm(config.success_hide(), move || view.set_success_visible(false));
    }

    /// Clear values plus every touched/valid flag and field cue
    fn reset(&mut self) {
        self.view.reset_fields();
        for (name, binding) in self.fields.iter_mut() {
            binding.reset();
            self.view.clear_field_error(name);
            self.view.set_field_cue(name, FieldCue::None);
        }
        self.banner_timer.cancel();
        self.view.hide_banner();
    }
}

#[derive(Default)]
struct ControllerState {
    forms: HashMap<FormId, FormRegistration>,
    submission: SubmissionState,
}

struct Shared {
    rules: RuleSet,
    transport: Arc<dyn ContactTransport>,
    config: ControllerConfig,
    state: Mutex<ControllerState>,
}

/// Owns every registered form and the single in-flight submission.
///
/// Cloning is cheap and yields a handle on the same forms. Everything that
/// schedules a delayed callback (validation, input, submit) expects to run
/// inside a Tokio runtime; without one the cosmetic timers are skipped.
#[derive(Clone)]
pub struct FormSubmissionController {
    shared: Arc<Shared>,
}

impl FormSubmissionController {
    pub fn new(rules: RuleSet, transport: Arc<dyn ContactTransport>, config: ControllerConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                rules,
                transport,
                config,
                state: Mutex::new(ControllerState::default()),
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.shared.config
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a form and bind its fields.
    pub fn register(
        &self,
        spec: FormSpec,
        view: Arc<dyn FormView>,
        hooks: FormHooks,
    ) -> Result<FormId, RegistrationError> {
        let mut seen = HashSet::new();
        for field in &spec.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(RegistrationError::DuplicateField {
                    form: spec.id.clone(),
                    field: field.name.clone(),
                });
            }
        }

        let mut state = self.state();
        if state.forms.contains_key(&spec.id) {
            return Err(RegistrationError::DuplicateForm(spec.id));
        }

        let fields = spec
            .fields
            .iter()
            .map(|field| (field.name.clone(), FieldBinding::from_spec(field)))
            .collect();

        info!(
            "Registered form '{}' with {} fields -> {}",
            spec.id,
            spec.fields.len(),
            spec.endpoint
        );

        state.forms.insert(
            spec.id.clone(),
            FormRegistration {
                endpoint: spec.endpoint,
                fields,
                view,
                hooks,
                phase: Phase::Idle,
                banner_timer: TimerSlot::default(),
                success_timer: TimerSlot::default(),
            },
        );

        Ok(spec.id)
    }

    pub fn form_ids(&self) -> Vec<FormId> {
        let mut ids: Vec<FormId> = self.state().forms.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn phase(&self, form: &FormId) -> Option<Phase> {
        self.state().forms.get(form).map(|reg| reg.phase)
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.state().submission.clone()
    }

    pub fn field_validity(&self, form: &FormId, field: &str) -> Option<Validity> {
        self.state()
            .forms
            .get(form)
            .and_then(|reg| reg.fields.get(field))
            .map(|binding| binding.validity)
    }

    pub fn is_touched(&self, form: &FormId, field: &str) -> Option<bool> {
        self.state()
            .forms
            .get(form)
            .and_then(|reg| reg.fields.get(field))
            .map(|binding| binding.touched)
    }

    /// Re-run a field's rules and render the result.
    ///
    /// Shows the first failing rule's message, or flags the field valid with
    /// a success cue that clears itself.
    pub fn validate_field(&self, form: &FormId, field: &str) -> bool {
        let shared = &self.shared;
        let mut state = self.state();
        match state.forms.get_mut(form) {
            Some(reg) => reg.validate_field(field, &shared.rules, &shared.config),
            None => {
                warn!("Validation requested for unknown form '{}'", form);
                false
            }
        }
    }

    /// Validate every bound field, refreshing each one's error state.
    pub fn validate_form(&self, form: &FormId) -> bool {
        let shared = &self.shared;
        let mut state = self.state();
        match state.forms.get_mut(form) {
            Some(reg) => reg.validate_form(&shared.rules, &shared.config),
            None => {
                warn!("Validation requested for unknown form '{}'", form);
                false
            }
        }
    }

    /// Focus clears the displayed error without re-validating.
    pub fn handle_focus(&self, form: &FormId, field: &str) {
        let mut state = self.state();
        let Some(reg) = state.forms.get_mut(form) else {
            return;
        };
        if let Some(binding) = reg.fields.get_mut(field) {
            binding.cue.cancel();
            reg.view.clear_field_error(field);
            reg.view.set_field_cue(field, FieldCue::None);
        }
    }

    /// Blur marks the field touched and validates it.
    pub fn handle_blur(&self, form: &FormId, field: &str) -> bool {
        let shared = &self.shared;
        let mut state = self.state();
        let Some(reg) = state.forms.get_mut(form) else {
            return false;
        };
        let Some(binding) = reg.fields.get_mut(field) else {
            return false;
        };
        binding.touched = true;
        binding.debounce.cancel();
        reg.validate_field(field, &shared.rules, &shared.config)
    }

    /// Input on a touched field schedules a debounced validation.
    ///
    /// A newer input supersedes the pending validation, so only the value
    /// present after the user pauses is validated.
    pub fn handle_input(&self, form: &FormId, field: &str) {
        let delay = self.shared.config.input_debounce();
        let mut state = self.state();
        let Some(binding) = state
            .forms
            .get_mut(form)
            .and_then(|reg| reg.fields.get_mut(field))
        else {
            return;
        };
        if !binding.touched {
            return;
        }

        let controller = self.clone();
        let form = form.clone();
        let name = field.to_string();
        binding.debounce.arm(delay, move || {
            controller.validate_field(&form, &name);
        });
    }

    /// Validate and submit a form.
    ///
    /// Dropped without side effects while any submission is in flight.
    /// Rejected forms show the banner and never reach the network. The
    /// request is abandoned once the configured timeout expires.
    pub async fn submit(&self, form: &FormId) -> SubmitOutcome {
        let shared = &self.shared;

        let (endpoint, payload) = {
            let mut state = self.state();
            if let SubmissionState::InFlight(current) = &state.submission {
                debug!("Submission of '{}' in flight, dropping submit of '{}'", current, form);
                return SubmitOutcome::Dropped;
            }

            let Some(reg) = state.forms.get_mut(form) else {
                warn!("Submit requested for unknown form '{}'", form);
                return SubmitOutcome::Dropped;
            };

            reg.phase = Phase::Validating;
            if !reg.validate_form(&shared.rules, &shared.config) {
                reg.phase = Phase::Idle;
                reg.show_banner(REJECTED_MESSAGE, &shared.config);
                let invalid_fields = reg.invalid_fields();
                warn!("Form '{}' rejected, invalid fields: {:?}", form, invalid_fields);
                return SubmitOutcome::Rejected { invalid_fields };
            }

            let payload = reg.collect_values();
            reg.phase = Phase::Submitting;
            reg.view.set_submitting(true);
            let endpoint = reg.endpoint.clone();

            state.submission = SubmissionState::InFlight(form.clone());
            (endpoint, payload)
        };

        let _cleanup = InFlightGuard {
            controller: self,
            form,
        };

        info!("Submitting form '{}' to {}", form, endpoint);
        let deadline = shared.config.request_timeout();
        let result = match tokio::time::timeout(deadline, shared.transport.post_json(&endpoint, &payload)).await {
            Err(_) => Err(SubmissionError::Timeout(deadline)),
            Ok(Err(e)) => Err(SubmissionError::Network(e.to_string())),
            Ok(Ok(response)) => response::interpret(&response),
        };

        match result {
            Ok(body) => {
                self.finish_success(form, &body);
                SubmitOutcome::Delivered(body)
            }
            Err(error) => {
                self.finish_failure(form, &error);
                SubmitOutcome::Failed(error)
            }
        }
    }

    fn finish_success(&self, form: &FormId, body: &Map<String, Value>) {
        let hook = {
            let shared = &self.shared;
            let mut state = self.state();
            let Some(reg) = state.forms.get_mut(form) else {
                return;
            };
            reg.phase = Phase::Succeeded;
            reg.view.set_submitting(false);
            reg.show_success(&shared.config);
            reg.reset();
            reg.hooks.on_success.clone()
        };

        info!("Form '{}' submitted", form);
        if let Some(hook) = hook {
            hook(form, body);
        }
    }

    fn finish_failure(&self, form: &FormId, error: &SubmissionError) {
        let hook = {
            let shared = &self.shared;
            let mut state = self.state();
            let Some(reg) = state.forms.get_mut(form) else {
                return;
            };
            reg.phase = Phase::Failed;
            reg.view.set_submitting(false);
            reg.show_banner(&error.banner_message(), &shared.config);
            reg.hooks.on_error.clone()
        };

        warn!("Submission of form '{}' failed: {}", form, error);
        if let Some(hook) = hook {
            hook(form, error);
        }
    }
}

/// Returns the controller to idle however the submission ends, including
/// when the submit future is dropped mid-flight.
struct InFlightGuard<'a> {
    controller: &'a FormSubmissionController,
    form: &'a FormId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.controller.state();
        state.submission = SubmissionState::Idle;
        if let Some(reg) = state.forms.get_mut(self.form) {
            reg.phase = Phase::Idle;
            reg.view.set_submitting(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{TransportError, TransportResponse};
    use crate::view::MemoryView;
    use async_trait::async_trait;
    use contact_forms_validation::RuleTag;

    struct Unreachable;

    #[async_trait]
    impl ContactTransport for Unreachable {
        async fn post_json(
            &self,
            _endpoint: &str,
            _payload: &Map<String, Value>,
        ) -> Result<TransportResponse, TransportError> {
            Err(TransportError::Other("unreachable".into()))
        }
    }

    fn controller() -> FormSubmissionController {
        FormSubmissionController::new(RuleSet::standard(), Arc::new(Unreachable), ControllerConfig::default())
    }

    #[test]
    fn test_duplicate_form_is_rejected() {
        let controller = controller();
        let spec = FormSpec::new("contact", "/api/contact").field("name", [RuleTag::Required]);

        controller
            .register(spec.clone(), Arc::new(MemoryView::new()), FormHooks::new())
            .unwrap();
        let err = controller
            .register(spec, Arc::new(MemoryView::new()), FormHooks::new())
            .unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateForm(FormId::new("contact")));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let spec = FormSpec::new("contact", "/api/contact")
            .field("email", [RuleTag::Required])
            .field("email", [RuleTag::Email]);

        let err = controller()
            .register(spec, Arc::new(MemoryView::new()), FormHooks::new())
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateField { ref field, .. } if field == "email"));
    }

    #[test]
    fn test_unknown_form_and_field() {
        let controller = controller();
        let unknown = FormId::new("missing");
        assert!(!controller.validate_field(&unknown, "name"));
        assert!(!controller.validate_form(&unknown));
        assert_eq!(controller.phase(&unknown), None);

        let form = controller
            .register(
                FormSpec::new("contact", "/api/contact").field("name", [RuleTag::Required]),
                Arc::new(MemoryView::new()),
                FormHooks::new(),
            )
            .unwrap();
        assert!(!controller.validate_field(&form, "nickname"));
        assert_eq!(controller.field_validity(&form, "nickname"), None);
    }

    #[test]
    fn test_clones_share_registered_forms() {
        let config = ControllerConfig {
            request_timeout_ms: 2_500,
            ..ControllerConfig::default()
        };
        let controller = FormSubmissionController::new(RuleSet::standard(), Arc::new(Unreachable), config.clone());
        let handle = controller.clone();
        assert!(handle.form_ids().is_empty());

        for id in ["quote", "contact"] {
            controller
                .register(
                    FormSpec::new(id, "/api/contact").field("name", [RuleTag::Required]),
                    Arc::new(MemoryView::new()),
                    FormHooks::new(),
                )
                .unwrap();
        }

        assert_eq!(handle.form_ids(), vec![FormId::new("contact"), FormId::new("quote")]);
        assert_eq!(handle.config(), &config);
        assert_eq!(handle.config().request_timeout(), std::time::Duration::from_millis(2_500));
    }

    #[tokio::test]
    async fn test_unknown_form_submit_is_dropped() {
        assert_eq!(controller().submit(&FormId::new("missing")).await, SubmitOutcome::Dropped);
    }
}
