//! Forwarding engine.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → forward.rs (method check, target URL, header filter, body)
//!     → outbound client call (bounded by timeouts)
//!     → 2xx/3xx: http::response relays status, headers, streamed body
//!     → 4xx/5xx: envelope.rs extracts a message, status preserved
//!     → no response: 502 with a fixed message
//!     → error.rs writes every failure as {"error": "..."}
//! ```
//!
//! # Design Decisions
//! - One inbound request yields exactly one response; no retries
//! - Failures are values (`ForwardError`), rendered once at the boundary
//! - Only the resolved upstream is shared between requests, read-only

pub mod envelope;
pub mod error;
pub mod forward;

pub use error::{ForwardError, TransportKind};
pub use forward::Forwarder;
