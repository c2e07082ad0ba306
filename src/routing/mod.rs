//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup, registration order)
//!     → matcher.rs (segment-bounded prefix match)
//!     → Return: RouteMatch { route, suffix } or no match
//! ```
//!
//! # Design Decisions
//! - Routes are a fixed, ordered list of immutable records
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - No fallback: unmatched paths never reach a backend

pub mod matcher;
pub mod router;

pub use router::{Route, RouteMatch, RouteTable};
