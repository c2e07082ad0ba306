//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn a backend response into the caller's response
//! - Drop hop-by-hop headers, keep everything else
//! - Stream the body without buffering
//!
//! # Design Decisions
//! - Status, headers and body bytes are passed through untouched
//! - A backend failure mid-body aborts the caller's connection

use axum::body::Body;
use axum::response::Response;
use hyper::body::Incoming;

use crate::security::headers;

/// Build the caller's response from the backend's.
pub fn from_upstream(upstream: hyper::Response<Incoming>) -> Response {
    let (parts, body) = upstream.into_parts();

    let mut response = Response::new(Body::new(body));
    *response.status_mut() = parts.status;
    *response.headers_mut() = headers::outbound_response_headers(&parts.headers);
    response
}
