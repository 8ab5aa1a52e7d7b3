// File: src/transport.rs
// Purpose: Delivery of the collected form values to the contact endpoint

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Map, Value};
use thiserror::Error;

/// Raw answer from the endpoint; the body is interpreted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Sends the form payload as a JSON POST.
///
/// Implementations do not enforce a deadline; the controller drops the
/// future when the request timeout expires.
#[async_trait]
pub trait ContactTransport: Send + Sync {
    async fn post_json(
        &self,
        endpoint: &str,
        payload: &Map<String, Value>,
    ) -> Result<TransportResponse, TransportError>;
}

/// [`ContactTransport`] over HTTP using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Relative endpoints such as `/api/contact` resolve against `base_url`.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url).map_err(|e| TransportError::InvalidEndpoint {
            endpoint: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn resolve(&self, endpoint: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| TransportError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl ContactTransport for HttpTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        payload: &Map<String, Value>,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.resolve(endpoint)?;
        tracing::debug!("POST {}", url);

        // .json() sets Content-Type: application/json
        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}
