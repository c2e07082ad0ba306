//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap backend calls with a response-head deadline
//! - Cancel operations cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::error::ProxyError;

/// Await `call`, failing with `ProxyError::UpstreamTimeout` after `limit`.
///
/// Dropping the inner future on timeout aborts the backend request.
pub async fn with_response_timeout<F, T, E>(limit: Duration, call: F) -> Result<T, ProxyError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<ProxyError>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(ProxyError::UpstreamTimeout),
    }
}
