//! Per-request proxy errors.

use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Rejected request path: {0}")]
    InvalidPath(String),

    #[error("No route for path: {0}")]
    NoRouteMatched(String),

    #[error("Request body exceeds the configured limit")]
    PayloadTooLarge,

    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Upstream response timeout")]
    UpstreamTimeout,

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Request build failed: {0}")]
    RequestBuild(String),
}

impl ProxyError {
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidPath(_) => "invalid_path",
            Self::NoRouteMatched(_) => "no_route_matched",
            Self::PayloadTooLarge => "payload_too_large",
            Self::UpstreamUnreachable(_) => "upstream_unreachable",
            Self::UpstreamTimeout => "upstream_timeout",
            Self::InvalidHeader(_) => "invalid_header",
            Self::RequestBuild(_) => "request_build_failed",
        }
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::NoRouteMatched(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::InvalidHeader(_) | Self::RequestBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<hyper_util::client::legacy::Error> for ProxyError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        if exceeded_body_limit(&err) {
            Self::PayloadTooLarge
        } else {
            Self::UpstreamUnreachable(err.to_string())
        }
    }
}

/// True if anything in the error's source chain is the request body limit.
///
/// Bodies without a `content-length` are only cut off while streaming, so the
/// limit surfaces as a failed upstream call.
pub fn exceeded_body_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Transport and build details stay in the logs
        let message = match &self {
            Self::InvalidPath(_) => "Invalid request path",
            Self::NoRouteMatched(_) => "No matching route found",
            Self::PayloadTooLarge => "Payload too large",
            Self::UpstreamUnreachable(_) => "Upstream request failed",
            Self::UpstreamTimeout => "Upstream request timed out",
            Self::InvalidHeader(_) | Self::RequestBuild(_) => "Internal server error",
        };

        (status, message).into_response()
    }
}
