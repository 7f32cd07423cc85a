//! Forwarding outcomes other than a relayed upstream success.
//!
//! Each variant is a terminal state: no retry and no fallback upstream.
//! [`ForwardError::into_response`] is the only place that turns a failure
//! into bytes for the client.

use std::error::Error as StdError;
use std::io;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::BoxError;
use hyper_util::client::legacy;
use thiserror::Error;

use crate::http::request::FORWARDED_METHODS;
use crate::proxy::envelope::{error_envelope, reason_phrase, upstream_error_body};

/// Why no response was received from the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Connect or request deadline elapsed.
    Timeout,
    /// Connection refused, DNS failure, TLS handshake failure.
    Connect,
    /// Connection dropped or body transfer failed before a response.
    Other,
}

impl TransportKind {
    /// Classify a client error that did not come with a response.
    pub fn of(err: &legacy::Error) -> Self {
        if !err.is_connect() {
            TransportKind::Other
        } else if caused_by_timeout(err) {
            TransportKind::Timeout
        } else {
            TransportKind::Connect
        }
    }

    /// Client-facing message for this condition.
    pub fn message(self) -> &'static str {
        match self {
            TransportKind::Timeout => "Upstream server did not respond in time",
            TransportKind::Connect => "Upstream server is unreachable",
            TransportKind::Other => "Upstream request failed before a response was received",
        }
    }

    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Timeout => "timeout",
            TransportKind::Connect => "connect",
            TransportKind::Other => "other",
        }
    }
}

/// A forwarding failure.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Inbound method the proxy does not forward.
    #[error("method {0} is not forwarded")]
    UnsupportedMethod(Method),

    /// The upstream answered with a 4xx or 5xx status.
    ///
    /// `body` holds at most the configured cap; `truncated` marks that
    /// the upstream sent more than that.
    #[error("upstream replied with {status}")]
    UpstreamStatus {
        status: StatusCode,
        body: Bytes,
        truncated: bool,
    },

    /// No response arrived from the upstream.
    #[error("{}: {source}", .kind.message())]
    Transport {
        kind: TransportKind,
        #[source]
        source: BoxError,
    },

    /// Any other fault inside the pipeline.
    #[error("{0}")]
    Unexpected(String),
}

impl ForwardError {
    /// Map a client error to the transport state.
    pub fn from_client(err: legacy::Error) -> Self {
        ForwardError::Transport {
            kind: TransportKind::of(&err),
            source: Box::new(err),
        }
    }

    /// The request deadline elapsed before the exchange finished.
    pub fn timed_out(elapsed: tokio::time::error::Elapsed) -> Self {
        ForwardError::Transport {
            kind: TransportKind::Timeout,
            source: Box::new(elapsed),
        }
    }

    /// The upstream connection failed while its error body was being read.
    pub fn body_read(err: axum::Error) -> Self {
        ForwardError::Transport {
            kind: TransportKind::Other,
            source: Box::new(err),
        }
    }

    /// Status code sent to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            ForwardError::UpstreamStatus { status, .. } => *status,
            ForwardError::Transport { .. } | ForwardError::Unexpected(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Outcome label used in logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ForwardError::UnsupportedMethod(_) => "rejected",
            ForwardError::UpstreamStatus { .. } => "upstream_error",
            ForwardError::Transport { .. } => "transport_error",
            ForwardError::Unexpected(_) => "unexpected_error",
        }
    }

    fn body(&self) -> Bytes {
        match self {
            ForwardError::UnsupportedMethod(method) => {
                error_envelope(&format!("Method {} is not supported by the proxy", method))
            }
            ForwardError::UpstreamStatus {
                status,
                truncated: true,
                ..
            } => error_envelope(reason_phrase(*status)),
            ForwardError::UpstreamStatus { status, body, .. } => upstream_error_body(*status, body),
            ForwardError::Transport { kind, .. } => error_envelope(kind.message()),
            ForwardError::Unexpected(description) => unexpected_body(description),
        }
    }
}

/// Whether a connect error was caused by the connect timeout.
fn caused_by_timeout(err: &legacy::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

/// Envelope for a fault that escaped the normal failure states.
pub fn unexpected_body(description: &str) -> Bytes {
    error_envelope(&format!("Proxy error: {}", description))
}

/// A JSON error response with the given status and envelope body.
pub fn json_error_response(status: StatusCode, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let mut response = json_error_response(self.status(), self.body());
        if matches!(self, ForwardError::UnsupportedMethod(_)) {
            if let Ok(allow) = HeaderValue::from_str(&FORWARDED_METHODS.join(", ")) {
                response.headers_mut().insert(header::ALLOW, allow);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upstream_status_is_preserved() {
        let err = ForwardError::UpstreamStatus {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: Bytes::from_static(br#"{"error":"invalid name"}"#),
            truncated: false,
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_json(response).await["error"], "invalid name");
    }

    #[tokio::test]
    async fn upstream_headers_are_not_relayed_on_error() {
        let err = ForwardError::UpstreamStatus {
            status: StatusCode::NOT_FOUND,
            body: Bytes::from_static(b"<html>missing</html>"),
            truncated: false,
        };
        let response = err.into_response();
        assert_eq!(response.headers().len(), 1);
        assert_eq!(body_json(response).await["error"], "Not Found");
    }

    #[tokio::test]
    async fn unexpected_is_bad_gateway_with_description() {
        let response = ForwardError::Unexpected("bad \"uri\"".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"], "Proxy error: bad \"uri\"");
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected() {
        let method = Method::from_bytes(b"PURGE").unwrap();
        let response = ForwardError::UnsupportedMethod(method).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers()[header::ALLOW],
            "GET, HEAD, POST, PUT, DELETE, PATCH, OPTIONS, TRACE"
        );
        assert_eq!(
            body_json(response).await["error"],
            "Method PURGE is not supported by the proxy"
        );
    }

    #[tokio::test]
    async fn truncated_error_body_uses_reason_phrase() {
        let err = ForwardError::UpstreamStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Bytes::from_static(br#"{"error":"partial"#),
            truncated: true,
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Internal Server Error");
    }

    #[tokio::test]
    async fn elapsed_deadline_is_a_timeout() {
        let elapsed = tokio::time::timeout(
            std::time::Duration::from_millis(1),
            std::future::pending::<()>(),
        )
        .await
        .unwrap_err();
        let err = ForwardError::timed_out(elapsed);
        assert!(matches!(
            err,
            ForwardError::Transport {
                kind: TransportKind::Timeout,
                ..
            }
        ));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await["error"],
            "Upstream server did not respond in time"
        );
    }

    #[test]
    fn outcomes_are_distinct() {
        assert_eq!(ForwardError::Unexpected(String::new()).outcome(), "unexpected_error");
        assert_eq!(
            ForwardError::UnsupportedMethod(Method::CONNECT).outcome(),
            "rejected"
        );
    }
}
