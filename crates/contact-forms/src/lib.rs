//! # Contact Forms
//!
//! Validation and submission for the site's contact form.
//!
//! A [`FormSubmissionController`] owns every registered form. Each form is a
//! declarative [`FormSpec`] (field names paired with their rule tags), a
//! [`FormView`] standing in for the page markup, and optional
//! [`FormHooks`]. Submissions go out through a [`ContactTransport`], by
//! default [`HttpTransport`].
//!
//! ## Submission lifecycle
//!
//! `Idle → Validating → Idle` when the form is rejected, or
//! `Idle → Validating → Submitting → Succeeded | Failed → Idle`.
//! At most one submission is in flight across all forms of a controller.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use contact_forms::{
//!     ControllerConfig, FormHooks, FormSpec, FormSubmissionController, HttpTransport, MemoryView,
//! };
//! use contact_forms_validation::{RuleSet, RuleTag};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let transport = HttpTransport::new("https://example.com")?;
//! let controller =
//!     FormSubmissionController::new(RuleSet::standard(), Arc::new(transport), ControllerConfig::default());
//!
//! let spec = FormSpec::new("contact", "/api/contact")
//!     .field("name", [RuleTag::Required, RuleTag::Name])
//!     .field("email", [RuleTag::Required, RuleTag::Email]);
//! let view = Arc::new(MemoryView::new());
//! let form = controller.register(spec, view, FormHooks::new())?;
//!
//! let outcome = controller.submit(&form).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod config;
pub mod controller;
pub mod error;
mod response;
mod timers;
pub mod transport;
pub mod view;

pub use binding::{FieldSpec, FormId, FormSpec, Validity};
pub use config::{ControllerConfig, FormsConfig};
pub use controller::{FormHooks, FormSubmissionController, Phase, SubmissionState, SubmitOutcome};
pub use error::{RegistrationError, SubmissionError, NETWORK_MESSAGE, REJECTED_MESSAGE};
pub use transport::{ContactTransport, HttpTransport, TransportError, TransportResponse};
pub use view::{FieldCue, FormView, MemoryView, MemoryViewState};
