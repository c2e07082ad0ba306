//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (request body size)
//!     → paths.rs (reject dot segments before routing)
//!     → [route matched]
//!     → credentials.rs (auth value + tenant for the backend)
//!     → headers.rs (copy inbound headers, override auth + tenant)
//!     → Forward
//! ```
//!
//! # Design Decisions
//! - Inbound credentials are never trusted or forwarded
//! - Secrets are marked sensitive and never logged

pub mod credentials;
pub mod headers;
pub mod limits;
pub mod paths;
