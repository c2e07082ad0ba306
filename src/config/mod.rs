//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment variables / TOML file
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Ambient settings have defaults; backend identities do not
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    AccessToken, BackendConfig, BackendKind, LifecycleConfig, LogFormat, ObservabilityConfig,
    ProxyConfig, UpstreamConfig, Upstreams,
};
