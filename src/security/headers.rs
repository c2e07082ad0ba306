//! Header manipulation for forwarded traffic.
//!
//! # Responsibilities
//! - Build outbound request headers: copy inbound, then override auth + tenant
//! - Strip hop-by-hop headers in both directions
//!
//! # Design Decisions
//! - Copy-then-override on a fresh map: `insert` replaces every prior value,
//!   so exactly one `authorization` and one `x-scope-orgid` leave the proxy
//! - `host` is never copied; the transport derives it from the target URL

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Tenant-scope header understood by the backends.
pub const X_SCOPE_ORGID: HeaderName = HeaderName::from_static("x-scope-orgid");

/// Connection-scoped headers that must not be forwarded.
const HOP_BY_HOP: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
];

/// Returns true for headers that only apply to a single connection.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Headers to send upstream.
pub fn outbound_request_headers(
    inbound: &HeaderMap,
    authorization: HeaderValue,
    tenant: HeaderValue,
) -> HeaderMap {
    let mut headers = copy_end_to_end(inbound, |name| name == header::HOST);
    headers.insert(header::AUTHORIZATION, authorization);
    headers.insert(X_SCOPE_ORGID, tenant);
    headers
}

/// Headers to return to the caller.
pub fn outbound_response_headers(upstream: &HeaderMap) -> HeaderMap {
    copy_end_to_end(upstream, |_| false)
}

fn copy_end_to_end<F>(source: &HeaderMap, skip: F) -> HeaderMap
where
    F: Fn(&HeaderName) -> bool,
{
    let mut headers = HeaderMap::with_capacity(source.len() + 2);
    for (name, value) in source {
        if is_hop_by_hop(name) || skip(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}
