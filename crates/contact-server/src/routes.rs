// File: src/routes.rs
// Purpose: HTTP routes for the site and the contact endpoint

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::mail::{Mailer, QuoteRequest};

/// Fields the contact form cannot be submitted without, in reporting order
const REQUIRED_FIELDS: [&str; 4] = ["name", "email", "message", "service"];

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when the mail settings are incomplete
    pub mailer: Option<Arc<dyn Mailer>>,
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(mailer: Option<Arc<dyn Mailer>>, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            mailer,
            public_dir: public_dir.into(),
        }
    }
}

/// Build the router
pub fn app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.public_dir);

    Router::new()
        .route("/", get(index_handler))
        .route("/robots.txt", get(robots_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/healthz", get(healthz_handler))
        .route("/api/contact", post(contact_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Response {
    match tokio::fs::read_to_string(state.public_dir.join("index.html")).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!("Failed to read index.html: {}", e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn robots_handler(State(state): State<AppState>) -> Response {
    public_file(&state, "robots.txt", "text/plain").await
}

async fn sitemap_handler(State(state): State<AppState>) -> Response {
    public_file(&state, "sitemap.xml", "application/xml").await
}

async fn public_file(state: &AppState, name: &str, content_type: &'static str) -> Response {
    match tokio::fs::read(state.public_dir.join(name)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(e) => {
            warn!("Failed to read {}: {}", name, e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn contact_handler(State(state): State<AppState>, body: Bytes) -> Response {
    // unparsable bodies count as empty
    let data = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let missing: Vec<&str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| field_text(&data, field).trim().is_empty())
        .collect();
    if !missing.is_empty() {
        warn!("Contact request missing fields: {:?}", missing);
        return failure(StatusCode::BAD_REQUEST, format!("Missing: {}", missing.join(", ")));
    }

    let request = QuoteRequest {
        name: field_text(&data, "name"),
        email: field_text(&data, "email"),
        phone: field_text(&data, "phone").trim().to_string(),
        service: field_text(&data, "service"),
        message: field_text(&data, "message"),
    };

    let Some(mailer) = state.mailer.as_ref() else {
        error!("Contact request received but mail server is not configured");
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Mail server not configured".to_string());
    };

    if let Err(e) = mailer.send(&request).await {
        error!("Email send failed: {}", e);
        return failure(StatusCode::INTERNAL_SERVER_ERROR, format!("Email send failed: {}", e));
    }

    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Quote request sent" })),
    )
        .into_response()
}

fn failure(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

/// A submitted value as text; `null` and `false` read as empty
fn field_text(data: &Map<String, Value>, field: &str) -> String {
    match data.get(field) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
