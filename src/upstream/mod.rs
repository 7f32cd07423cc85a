//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     UpstreamConfig.url (raw, maybe scheme-less)
//!     → resolver.rs (normalize to a fully-qualified base URL)
//!     → Upstream (immutable, shared via Arc)
//!
//! Per request:
//!     Forwarder reads Upstream::base_url()
//!     → client.rs (pooled hyper client, plain or TLS, bounded by timeouts)
//! ```
//!
//! # Design Decisions
//! - Exactly one upstream; no load balancing
//! - Resolution never fails; validation rejects unusable URLs separately
//! - Every outbound call has a deadline

pub mod client;
pub mod resolver;

pub use client::{build_client, UpstreamClient, UpstreamResponse};
pub use resolver::{resolve, Upstream, DEFAULT_UPSTREAM};
