//! The `{"error": "..."}` envelope and upstream error-message extraction.

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::{Map, Value};

/// Serialize a message as `{"error":"<message>"}`.
///
/// Backslash, quote and control characters (newline, carriage return,
/// tab included) are escaped so the body always parses as JSON.
pub fn error_envelope(message: &str) -> Bytes {
    let mut envelope = Map::with_capacity(1);
    envelope.insert("error".to_string(), Value::String(message.to_string()));
    Bytes::from(Value::Object(envelope).to_string())
}

/// What an upstream error body turned out to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamErrorBody {
    /// A JSON object whose `error` field yielded a message.
    Message(String),
    /// Already a JSON error document; relay it untouched.
    Passthrough,
    /// Nothing usable; fall back to the status reason phrase.
    Unusable,
}

/// Classify an upstream 4xx/5xx body.
pub fn classify(body: &[u8]) -> UpstreamErrorBody {
    if body.is_empty() {
        return UpstreamErrorBody::Unusable;
    }

    match serde_json::from_slice::<Map<String, Value>>(body) {
        Ok(object) => match object.get("error") {
            Some(Value::String(message)) => UpstreamErrorBody::Message(message.clone()),
            // `null` carries no message; the document is relayed as-is.
            Some(Value::Null) | None => UpstreamErrorBody::Passthrough,
            Some(other) => UpstreamErrorBody::Message(other.to_string()),
        },
        Err(_) if starts_with_brace(body) => UpstreamErrorBody::Passthrough,
        Err(_) => UpstreamErrorBody::Unusable,
    }
}

/// Build the client body for an upstream 4xx/5xx reply.
pub fn upstream_error_body(status: StatusCode, body: &Bytes) -> Bytes {
    match classify(body) {
        UpstreamErrorBody::Message(message) => error_envelope(&message),
        UpstreamErrorBody::Passthrough => body.clone(),
        UpstreamErrorBody::Unusable => error_envelope(reason_phrase(status)),
    }
}

/// Canonical reason phrase, or a generic label for unregistered codes.
pub fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Upstream error")
}

fn starts_with_brace(body: &[u8]) -> bool {
    body.iter().find(|b| **b > b' ') == Some(&b'{')
}
