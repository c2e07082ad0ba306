//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits so the same structure can be read from a
//! TOML file or assembled from environment variables.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8085;

/// The observability backends fronted by the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Metrics backend (Prometheus remote-write and query API).
    Prometheus,
    /// Logs backend.
    Loki,
    /// Traces backend.
    Tempo,
    /// Generic OTLP ingestion backend.
    Otlp,
}

impl BackendKind {
    /// Every backend kind, in configuration order.
    pub const ALL: [BackendKind; 4] = [
        BackendKind::Prometheus,
        BackendKind::Loki,
        BackendKind::Tempo,
        BackendKind::Otlp,
    ];

    /// Stable label used in metrics and configuration keys.
    pub const fn label(self) -> &'static str {
        match self {
            BackendKind::Prometheus => "prometheus",
            BackendKind::Loki => "loki",
            BackendKind::Tempo => "tempo",
            BackendKind::Otlp => "otlp",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// One backend per kind.
    pub upstreams: Upstreams,

    /// Access token shared by every backend.
    pub access_token: AccessToken,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Outbound transport limits.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Startup/shutdown settings.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl ProxyConfig {
    /// Create a configuration with default ambient settings.
    pub fn new(upstreams: Upstreams, access_token: impl Into<AccessToken>) -> Self {
        Self {
            upstreams,
            access_token: access_token.into(),
            port: DEFAULT_PORT,
            upstream: UpstreamConfig::default(),
            observability: ObservabilityConfig::default(),
            lifecycle: LifecycleConfig::default(),
        }
    }

    /// Backend configuration for the given kind.
    pub fn backend(&self, kind: BackendKind) -> &BackendConfig {
        self.upstreams.get(kind)
    }
}

/// Per-kind backend table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Upstreams {
    pub prometheus: BackendConfig,
    pub loki: BackendConfig,
    pub tempo: BackendConfig,
    pub otlp: BackendConfig,
}

impl Upstreams {
    pub fn get(&self, kind: BackendKind) -> &BackendConfig {
        match kind {
            BackendKind::Prometheus => &self.prometheus,
            BackendKind::Loki => &self.loki,
            BackendKind::Tempo => &self.tempo,
            BackendKind::Otlp => &self.otlp,
        }
    }
}

/// A single backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Absolute base URL of the backend.
    pub url: Url,

    /// Organization identity assigned by the backend (basic-auth user).
    pub org_id: String,

    /// Optional tenant override for the scope header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl BackendConfig {
    pub fn new(url: Url, org_id: impl Into<String>) -> Self {
        Self {
            url,
            org_id: org_id.into(),
            tenant_id: None,
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}

/// Shared access token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Outbound transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Time allowed for the backend to produce response headers, in seconds.
    /// Body streaming is not bounded by this.
    pub response_timeout_secs: u64,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            response_timeout_secs: 30,
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Time allowed for in-flight requests to drain after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            shutdown_grace_secs: 30,
        }
    }
}
