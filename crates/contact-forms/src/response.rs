// File: src/response.rs
// Purpose: Interpretation of the endpoint's answer

use serde_json::{Map, Value};

use crate::error::SubmissionError;
use crate::transport::TransportResponse;

/// Parse the body leniently: anything but a JSON object is an empty map.
pub(crate) fn parse_body(body: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// A submission succeeded only with a 2xx status and a truthy `success`.
pub(crate) fn interpret(response: &TransportResponse) -> Result<Map<String, Value>, SubmissionError> {
    let body = parse_body(&response.body);
    let accepted = body.get("success").is_some_and(is_truthy);

    if response.is_success() && accepted {
        return Ok(body);
    }

    let message = match body.get("error") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(other) if is_truthy(other) => other.to_string(),
        _ => format!("HTTP {}", response.status),
    };

    Err(SubmissionError::Declined {
        status: response.status,
        message,
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
