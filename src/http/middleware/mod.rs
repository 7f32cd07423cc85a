//! Middleware applied in front of the forwarding handler.

pub mod cors;
pub mod panic;

pub use cors::cors_layer;
pub use panic::panic_response;
