//! Shared fixtures for controller integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use contact_forms::{
    ContactTransport, ControllerConfig, FormHooks, FormId, FormSpec, FormSubmissionController, MemoryView,
    TransportError, TransportResponse,
};
use contact_forms_validation::{RuleSet, RuleTag};
use serde_json::{Map, Value};
use tokio::sync::Semaphore;

/// How the mock endpoint answers.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(u16, String),
    Fail(String),
    /// Never answers
    Hang,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Reply::Respond(status, body.to_string())
    }
}

/// Records every request and answers with a fixed reply.
pub struct MockTransport {
    reply: Reply,
    gate: Option<Arc<Semaphore>>,
    calls: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl MockTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            gate: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Holds each request until a permit is added to the returned semaphore
    pub fn gated(reply: Reply) -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Arc::new(Self {
            reply,
            gate: Some(gate.clone()),
            calls: Mutex::new(Vec::new()),
        });
        (transport, gate)
    }

    pub fn calls(&self) -> Vec<(String, Map<String, Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ContactTransport for MockTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        payload: &Map<String, Value>,
    ) -> Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), payload.clone()));

        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.unwrap();
        }

        match &self.reply {
            Reply::Respond(status, body) => Ok(TransportResponse::new(*status, body.clone())),
            Reply::Fail(reason) => Err(TransportError::Other(reason.clone())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// The site's contact form
pub fn contact_spec(id: &str) -> FormSpec {
    FormSpec::new(id, "/api/contact")
        .field("name", [RuleTag::Required, RuleTag::Name])
        .field("email", [RuleTag::Required, RuleTag::Email])
        .field("phone", [RuleTag::Phone])
        .field("service", [RuleTag::Required])
        .field("message", [RuleTag::Required, RuleTag::MessageLength])
}

pub fn filled_view() -> Arc<MemoryView> {
    Arc::new(MemoryView::with_values([
        ("name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("phone", "(555) 123-4567"),
        ("service", "roofing"),
        ("message", "Please quote a full roof replacement."),
    ]))
}

pub fn controller(transport: Arc<dyn ContactTransport>) -> FormSubmissionController {
    FormSubmissionController::new(RuleSet::standard(), transport, ControllerConfig::default())
}

pub fn register(
    controller: &FormSubmissionController,
    id: &str,
    view: Arc<MemoryView>,
    hooks: FormHooks,
) -> FormId {
    controller.register(contact_spec(id), view, hooks).unwrap()
}

/// Let spawned tasks run without advancing paused time
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
