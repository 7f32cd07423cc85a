//! Last-resort handling for panics inside the request pipeline.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::Response;

use crate::proxy::error::{json_error_response, unexpected_body};

/// Turn a caught panic into a 502 JSON envelope.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let description = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown fault"
    };

    tracing::error!(panic = %description, "Request handler panicked");

    json_error_response(StatusCode::BAD_GATEWAY, unexpected_body(description))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn panic_message_is_enveloped() {
        let response = panic_response(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Proxy error: index out of bounds");
    }

    #[tokio::test]
    async fn opaque_payload_still_answers() {
        let response = panic_response(Box::new(42u8));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
