//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy handler produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (per-backend counters and histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through logs and to the backend
//! - Metrics are cheap (atomic increments)
//! - Secrets never appear in log fields

pub mod logging;
pub mod metrics;
