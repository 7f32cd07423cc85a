//! A pretend upstream application for trying the proxy by hand.
//!
//! ```text
//! cargo run --example mock_upstream
//! FRONTDOOR_UPSTREAM_URL=http://127.0.0.1:3000 cargo run
//! curl -i localhost:8080/api/uslugi
//! ```

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/", get(|| async { "Hello from the pretend upstream!" }))
        .route(
            "/api/uslugi",
            get(|| async { Json(json!([{ "id": 1, "name": "Fitness" }])) }),
        )
        .route(
            "/api/clients",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "error": "Client name must not be empty" })),
                )
            }),
        )
        .route(
            "/api/avtorizaciya/vhod",
            post(|| async {
                (
                    [(header::SET_COOKIE, "session=demo; Path=/; HttpOnly")],
                    Json(json!({ "ok": true })),
                )
                    .into_response()
            }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "stack trace goes here") }),
        );

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Pretend upstream is listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
