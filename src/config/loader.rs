//! Configuration loading from the environment or from disk.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use url::Url;

use crate::config::schema::{AccessToken, BackendConfig, BackendKind, ProxyConfig, Upstreams};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the shared access token.
pub const ACCESS_TOKEN_VAR: &str = "GRAFANA_CLOUD_ACCESS_TOKEN";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProxyConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from the process environment.
pub fn from_env() -> Result<ProxyConfig, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Load and validate configuration from an arbitrary key/value source.
///
/// Values that are empty after trimming are treated as absent.
pub fn from_lookup<F>(lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvSource { lookup };

    let upstreams = Upstreams {
        prometheus: env.backend(BackendKind::Prometheus)?,
        loki: env.backend(BackendKind::Loki)?,
        tempo: env.backend(BackendKind::Tempo)?,
        otlp: env.backend(BackendKind::Otlp)?,
    };
    let access_token = AccessToken::new(env.required(ACCESS_TOKEN_VAR)?);

    let mut config = ProxyConfig::new(upstreams, access_token);

    if let Some(port) = env.parsed::<u16>("PORT")? {
        config.port = port;
    }
    if let Some(secs) = env.parsed::<u64>("PROXY_CONNECT_TIMEOUT_SECS")? {
        config.upstream.connect_timeout_secs = secs;
    }
    if let Some(secs) = env.parsed::<u64>("PROXY_RESPONSE_TIMEOUT_SECS")? {
        config.upstream.response_timeout_secs = secs;
    }
    if let Some(bytes) = env.parsed::<usize>("PROXY_MAX_BODY_BYTES")? {
        config.upstream.max_body_bytes = bytes;
    }
    if let Some(secs) = env.parsed::<u64>("PROXY_SHUTDOWN_GRACE_SECS")? {
        config.lifecycle.shutdown_grace_secs = secs;
    }
    if let Some(level) = env.optional("LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(format) = env.parsed("LOG_FORMAT")? {
        config.observability.log_format = format;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Environment variable prefix for a backend, e.g. `GRAFANA_CLOUD_LOKI`.
pub fn env_prefix(kind: BackendKind) -> String {
    format!("GRAFANA_CLOUD_{}", kind.label().to_ascii_uppercase())
}

struct EnvSource<F> {
    lookup: F,
}

impl<F> EnvSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    fn parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.optional(key) else {
            return Ok(None);
        };
        raw.parse::<T>().map(Some).map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn backend(&self, kind: BackendKind) -> Result<BackendConfig, ConfigError> {
        let prefix = env_prefix(kind);
        let url_key = format!("{prefix}_URL");

        let raw_url = self.required(&url_key)?;
        let url = Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
            key: url_key,
            reason: e.to_string(),
        })?;

        Ok(BackendConfig {
            url,
            org_id: self.required(&format!("{prefix}_ORG_ID"))?,
            tenant_id: self.optional(&format!("{prefix}_TENANT_ID")),
        })
    }
}
