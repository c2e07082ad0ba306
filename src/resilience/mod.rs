//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts.rs (connect timeout on the client, deadline for response headers)
//!     → On failure: gateway error to the caller, never retried
//! ```
//!
//! # Design Decisions
//! - Every backend call has a deadline for its response head
//! - Body streaming is not bounded; large batches may take as long as they need
//! - No retries: bodies are streamed once and never replayed

pub mod timeouts;
