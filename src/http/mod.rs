//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handlers)
//!     → request.rs (request ID, tracing span)
//!     → [routing layer selects route]
//!     → proxy.rs (rewrite, inject credentials, forward)
//!     → response.rs (pass status/headers/body back, streamed)
//!     → Send to client
//! ```

pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use proxy::Forwarder;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
