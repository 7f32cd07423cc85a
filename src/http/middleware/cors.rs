//! CORS layer.
//!
//! Preflight requests are answered here and never reach the upstream.
//! Simple requests are forwarded and get the CORS headers added on the way back.

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer, or `None` when CORS is disabled.
pub fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if !config.enabled {
        return None;
    }

    let origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(Any)
            .expose_headers(Any)
            .max_age(Duration::from_secs(config.max_age_secs)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::{routing::any, Router};
    use tower::ServiceExt;

    fn app(config: &CorsConfig) -> Router {
        let router = Router::new().route("/{*path}", any(|| async { "upstream" }));
        match cors_layer(config) {
            Some(layer) => router.layer(layer),
            None => router,
        }
    }

    #[test]
    fn disabled_yields_no_layer() {
        let config = CorsConfig {
            enabled: false,
            ..CorsConfig::default()
        };
        assert!(cors_layer(&config).is_none());
    }

    #[tokio::test]
    async fn preflight_is_answered_locally() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/zapisi")
            .header(header::ORIGIN, "https://club.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom")
            .body(Body::empty())
            .unwrap();

        let response = app(&CorsConfig::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("PATCH"));

        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn specific_origins_are_echoed() {
        let config = CorsConfig {
            allowed_origins: vec!["https://club.example".into()],
            ..CorsConfig::default()
        };
        let request = Request::builder()
            .uri("/api/uslugi")
            .header(header::ORIGIN, "https://club.example")
            .body(Body::empty())
            .unwrap();

        let response = app(&config).oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://club.example"
        );
    }
}
