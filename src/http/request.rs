//! Request handling and transformation.
//!
//! # Responsibilities
//! - Build the upstream target URL from the inbound path and query
//! - Filter inbound headers for the outbound request
//! - Decide whether the inbound method may be forwarded
//! - Assemble the outbound request around the untouched inbound body
//!
//! # Design Decisions
//! - Path and query are copied byte-for-byte, never decoded or re-encoded
//! - Only `Host` and `Content-Length` are dropped; the client regenerates both
//! - Repeated headers stay repeated, in their original order
//! - The target string becomes the request URI as-is: no dot-segment
//!   removal and no re-encoding
//! - Bodies stream through; the client frames them from their size hint

use axum::body::Body;
use axum::http::{header, uri::InvalidUri, HeaderMap, Method, Request, Uri};

/// Methods the proxy forwards. Anything else is rejected before dispatch.
pub const FORWARDED_METHODS: [&str; 8] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "PATCH", "OPTIONS", "TRACE",
];

/// Concatenate the upstream base URL, the inbound path and, when present,
/// `?` plus the inbound query string.
pub fn build_target_url(base_url: &str, uri: &Uri) -> String {
    let path = uri.path();
    let query = uri.query();

    let mut target =
        String::with_capacity(base_url.len() + path.len() + query.map_or(0, |q| q.len() + 1));
    target.push_str(base_url);
    target.push_str(path);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target
}

/// Copy every inbound header except `Host` and `Content-Length`.
pub fn outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if name == header::HOST || name == header::CONTENT_LENGTH {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Returns true if the method is one the proxy forwards.
pub fn is_forwardable(method: &Method) -> bool {
    FORWARDED_METHODS.contains(&method.as_str())
}

/// Assemble the outbound request aimed at `target`.
///
/// The method and body are moved over untouched and the headers are
/// filtered by [`outbound_headers`]. The version is left at the client
/// default so the connection to the upstream picks its own protocol.
pub fn outbound_request(
    method: Method,
    target: &str,
    inbound_headers: &HeaderMap,
    body: Body,
) -> Result<Request<Body>, InvalidUri> {
    let uri = Uri::try_from(target)?;

    let mut request = Request::new(body);
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    *request.headers_mut() = outbound_headers(inbound_headers);
    Ok(request)
}
