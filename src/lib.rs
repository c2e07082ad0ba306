//! Multi-tenant reverse proxy for Prometheus, Loki, Tempo and OTLP backends.
//!
//! Every forwarded request gets the backend's basic credentials and tenant
//! scope header; everything else passes through untouched.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;

pub use config::{BackendConfig, BackendKind, ProxyConfig};
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
