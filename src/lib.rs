//! Transparent single-upstream HTTP reverse proxy.
//!
//! Every inbound request, on any path and with any standard method, is
//! forwarded to one configured upstream origin with its method, headers
//! (minus `Host` and `Content-Length`), body and query string intact.
//! The upstream's status, headers (minus `Transfer-Encoding`) and body
//! are relayed back. Failures become a `{"error": "..."}` JSON body.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod upstream;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::{ForwardError, Forwarder};
pub use upstream::{resolve, Upstream};
