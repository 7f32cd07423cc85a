//! Response handling and transformation.
//!
//! # Responsibilities
//! - Filter upstream response headers for the client
//! - Relay the upstream status code unchanged
//! - Stream the upstream body back without buffering
//! - Read upstream error bodies up to a size cap
//!
//! # Design Decisions
//! - Only `Transfer-Encoding` is dropped; framing is recomputed by the server
//! - 2xx and 3xx statuses are never remapped
//! - `Set-Cookie` and other repeated headers keep every value

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use axum::BoxError;
use futures_util::StreamExt;

/// Copy every upstream response header except `Transfer-Encoding`.
pub fn client_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if name == header::TRANSFER_ENCODING {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Turn a successful upstream response into the client response.
pub fn relay<B>(upstream: axum::http::Response<B>) -> Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let (parts, body) = upstream.into_parts();

    let mut response = Response::new(Body::new(body));
    *response.status_mut() = parts.status;
    *response.headers_mut() = client_headers(&parts.headers);
    response
}

/// An upstream body read up to a size cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CappedBody {
    /// At most `limit` bytes from the start of the body.
    pub bytes: Bytes,
    /// The body had more than `limit` bytes; the rest was not read.
    pub truncated: bool,
}

/// Read at most `limit` bytes of `body`.
pub async fn read_capped(body: Body, limit: usize) -> Result<CappedBody, axum::Error> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let room = limit - buf.len();
        if chunk.len() > room {
            buf.extend_from_slice(&chunk[..room]);
            return Ok(CappedBody {
                bytes: Bytes::from(buf),
                truncated: true,
            });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(CappedBody {
        bytes: Bytes::from(buf),
        truncated: false,
    })
}
