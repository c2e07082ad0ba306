//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define proxy metrics (request count, latency) per backend
//! - Install the Prometheus recorder once per process
//! - Render the text exposition for the `/metrics` endpoint
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by upstream, method, status
//! - `proxy_request_duration_seconds` (histogram): latency by upstream, method
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations via the `metrics` facade)
//! - Recording never fails or delays the proxied response
//! - Exactly one observation per forwarded request, enforced by `RequestTimer`

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};

use crate::config::BackendKind;

pub const REQUESTS_TOTAL: &str = "proxy_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "proxy_request_duration_seconds";

/// Histogram buckets for request latency, in seconds.
pub const LATENCY_BUCKETS: [f64; 9] = [0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Status recorded when the caller goes away before a response is produced.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Prometheus text exposition content type.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Build a recorder with the proxy's histogram buckets, without installing it.
pub fn build_recorder() -> Result<PrometheusRecorder, BuildError> {
    Ok(PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
            &LATENCY_BUCKETS,
        )?
        .build_recorder())
}

/// Install the global Prometheus recorder and return its handle.
///
/// Safe to call more than once; later calls return the same handle.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = match build_recorder() {
                Ok(recorder) => recorder,
                Err(e) => {
                    tracing::warn!(error = %e, "Falling back to default histogram buckets");
                    PrometheusBuilder::new().build_recorder()
                }
            };
            let handle = recorder.handle();

            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!(
                    "Global metrics recorder already installed; exposition will be empty"
                );
            }

            describe_counter!(REQUESTS_TOTAL, "Total number of proxy requests");
            describe_histogram!(
                REQUEST_DURATION_SECONDS,
                Unit::Seconds,
                "Duration of proxy requests in seconds"
            );

            handle
        })
        .clone()
}

/// Record one forwarded request.
pub fn record_request(upstream: BackendKind, method: &Method, status: u16, elapsed: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "upstream" => upstream.label(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        REQUEST_DURATION_SECONDS,
        "upstream" => upstream.label(),
        "method" => method.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Latency timer for a single forwarded request.
///
/// Records on `finish`, or with status 499 if dropped unfinished.
#[derive(Debug)]
pub struct RequestTimer {
    upstream: BackendKind,
    method: Method,
    start: Instant,
    recorded: bool,
}

impl RequestTimer {
    pub fn start(upstream: BackendKind, method: &Method) -> Self {
        Self {
            upstream,
            method: method.clone(),
            start: Instant::now(),
            recorded: false,
        }
    }

    pub fn finish(mut self, status: StatusCode) {
        self.record(status.as_u16());
    }

    fn record(&mut self, status: u16) {
        if self.recorded {
            return;
        }
        self.recorded = true;
        record_request(self.upstream, &self.method, status, self.start.elapsed());
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        if !self.recorded {
            tracing::debug!(
                upstream = %self.upstream,
                method = %self.method,
                "Request dropped before completion"
            );
            self.record(CLIENT_CLOSED_REQUEST);
        }
    }
}

/// Render the current metric values as a scrape response.
pub fn exposition(handle: &PrometheusHandle) -> Response {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        handle.render(),
    )
        .into_response()
}
