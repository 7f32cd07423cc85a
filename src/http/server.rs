//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all forwarding route
//! - Wire up middleware (tracing, panic catch, CORS)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::middleware::{cors_layer, panic_response};
use crate::observability::{metrics, tracing::request_span};
use crate::proxy::{ForwardError, Forwarder};
use crate::upstream::{build_client, Upstream};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    upstream: Arc<Upstream>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Resolves the upstream once; the result is shared read-only by
    /// every request for the lifetime of the server.
    pub fn new(config: &ProxyConfig) -> Result<Self, rustls::Error> {
        let upstream = Arc::new(Upstream::from_config(&config.upstream));
        let client = build_client(&config.upstream, &config.timeouts)?;

        let forwarder = Arc::new(Forwarder::new(
            upstream.clone(),
            client,
            Duration::from_secs(config.timeouts.request_secs),
            config.upstream.max_error_body_bytes,
        ));

        let router = Self::build_router(config, AppState { forwarder });
        Ok(Self { router, upstream })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state);

        if let Some(cors) = cors_layer(&config.cors) {
            router = router.layer(cors);
        }

        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
    }

    /// Run the server until the shutdown signal fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.upstream.base_url(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The resolved upstream.
    pub fn upstream(&self) -> &Upstream {
        &self.upstream
    }
}

/// Catch-all handler: every path and method lands here.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match state.forwarder.forward(request).await {
        Ok(response) => {
            metrics::record_request(method.as_str(), response.status().as_u16(), "forwarded", start_time);
            response
        }
        Err(err) => {
            log_failure(&err, &path);
            metrics::record_request(method.as_str(), err.status().as_u16(), err.outcome(), start_time);
            err.into_response()
        }
    }
}

fn log_failure(err: &ForwardError, path: &str) {
    match err {
        ForwardError::UnsupportedMethod(method) => {
            tracing::warn!(method = %method, path = %path, "Rejected unsupported method");
        }
        ForwardError::UpstreamStatus {
            status,
            body,
            truncated,
        } => {
            tracing::warn!(
                status = %status,
                path = %path,
                body_bytes = body.len(),
                truncated = *truncated,
                "Upstream returned an error status"
            );
        }
        ForwardError::Transport { kind, source } => {
            tracing::error!(
                kind = kind.as_str(),
                path = %path,
                error = %source,
                "Upstream unreachable"
            );
        }
        ForwardError::Unexpected(description) => {
            tracing::error!(path = %path, error = %description, "Forwarding failed");
        }
    }
}
