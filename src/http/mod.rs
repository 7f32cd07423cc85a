//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, single catch-all route)
//!     → middleware/ (trace span, panic catch, CORS)
//!     → request.rs (target URL, header filter, method check, body)
//!     → [proxy::Forwarder dispatches upstream]
//!     → response.rs (header filter, status passthrough, streamed body)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use server::HttpServer;
