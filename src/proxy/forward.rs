//! The forwarding operation.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use tokio::time::{timeout_at, Instant};

use crate::http::{request, response};
use crate::proxy::error::ForwardError;
use crate::upstream::{Upstream, UpstreamClient};

/// Forwards inbound requests to the single upstream.
#[derive(Debug, Clone)]
pub struct Forwarder {
    upstream: Arc<Upstream>,
    client: UpstreamClient,
    request_timeout: Duration,
    error_body_limit: usize,
}

impl Forwarder {
    /// Create a forwarder over a resolved upstream and a pooled client.
    pub fn new(
        upstream: Arc<Upstream>,
        client: UpstreamClient,
        request_timeout: Duration,
        error_body_limit: usize,
    ) -> Self {
        Self {
            upstream,
            client,
            request_timeout,
            error_body_limit,
        }
    }

    /// Forward one inbound request and await the upstream's answer.
    ///
    /// `Ok` carries a relayed 1xx/2xx/3xx response. Every other outcome is
    /// a [`ForwardError`]. Dropping the returned future aborts the
    /// outbound call.
    pub async fn forward(&self, inbound: Request<Body>) -> Result<Response, ForwardError> {
        let (parts, body) = inbound.into_parts();

        if !request::is_forwardable(&parts.method) {
            return Err(ForwardError::UnsupportedMethod(parts.method));
        }

        let target = request::build_target_url(self.upstream.base_url(), &parts.uri);
        tracing::debug!(method = %parts.method, target = %target, "Forwarding request");

        let outbound = request::outbound_request(parts.method, &target, &parts.headers, body)
            .map_err(|e| ForwardError::Unexpected(format!("invalid target '{}': {}", target, e)))?;

        let deadline = Instant::now() + self.request_timeout;
        let upstream = timeout_at(deadline, self.client.request(outbound))
            .await
            .map_err(ForwardError::timed_out)?
            .map_err(ForwardError::from_client)?;

        let status = upstream.status();
        if status.is_client_error() || status.is_server_error() {
            let read = response::read_capped(Body::new(upstream.into_body()), self.error_body_limit);
            let capped = timeout_at(deadline, read)
                .await
                .map_err(ForwardError::timed_out)?
                .map_err(ForwardError::body_read)?;

            return Err(ForwardError::UpstreamStatus {
                status,
                body: capped.bytes,
                truncated: capped.truncated,
            });
        }

        Ok(response::relay(upstream))
    }
}
