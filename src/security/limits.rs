//! Request limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size
//!
//! # Design Decisions
//! - Declared `content-length` over the limit is rejected with 413 before
//!   any backend is contacted
//! - Streamed bodies without a length are cut off at the limit; the failed
//!   backend call is reported to the caller as 413

use tower_http::limit::RequestBodyLimitLayer;

use crate::config::UpstreamConfig;

/// Body limit layer for the proxy router.
pub fn body_limit_layer(config: &UpstreamConfig) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(config.max_body_bytes)
}
