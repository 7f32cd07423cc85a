//! Outbound HTTP client construction.
//!
//! # Responsibilities
//! - Build the pooled client shared by all requests
//! - Speak plain HTTP or TLS depending on the upstream scheme
//! - Apply connect and idle timeouts (the request deadline is enforced per call)
//!
//! # Design Decisions
//! - The request URI is sent exactly as built, never parsed into a URL and re-serialized
//! - No headers are added beyond the `Host` the transport needs
//! - Redirects are relayed to the caller, never followed
//! - No automatic decompression, bodies pass through as sent

use std::time::Duration;

use axum::body::Body;
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};

use crate::config::{TimeoutConfig, UpstreamConfig};

/// Pooled client used for every upstream call.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// What the upstream sends back before any filtering.
pub type UpstreamResponse = hyper::Response<Incoming>;

/// Build the outbound client.
///
/// Fails only if the TLS configuration cannot be assembled.
pub fn build_client(
    upstream: &UpstreamConfig,
    timeouts: &TimeoutConfig,
) -> Result<UpstreamClient, rustls::Error> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_nodelay(true);
    http.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

    let https = HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http);

    let client = Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
        .pool_max_idle_per_host(upstream.pool_max_idle_per_host)
        .pool_timer(TokioTimer::new())
        .build(https);

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_with_defaults() {
        let client = build_client(&UpstreamConfig::default(), &TimeoutConfig::default());
        assert!(client.is_ok());
    }
}
