//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Backend URLs are absolute http(s) URLs with a host
//! - Org and tenant identities are non-empty and usable as header values
//! - Shared access token is present, port and limits are non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;

use crate::config::schema::{BackendKind, ProxyConfig};

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `upstreams.loki.org_id`.
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Validate a fully assembled configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for kind in BackendKind::ALL {
        let backend = config.backend(kind);
        let field = |name: &str| format!("upstreams.{}.{}", kind.label(), name);

        match backend.url.scheme() {
            "http" | "https" => {}
            other => errors.push(ValidationError::new(
                field("url"),
                format!("unsupported scheme '{other}', expected http or https"),
            )),
        }
        if backend.url.host_str().map_or(true, str::is_empty) {
            errors.push(ValidationError::new(field("url"), "must include a host"));
        }

        if backend.org_id.is_empty() {
            errors.push(ValidationError::new(field("org_id"), "must not be empty"));
        } else if HeaderValue::from_str(&backend.org_id).is_err() {
            errors.push(ValidationError::new(
                field("org_id"),
                "contains characters not allowed in a header value",
            ));
        }

        if let Some(tenant) = backend.tenant_id.as_deref() {
            if !tenant.is_empty() && HeaderValue::from_str(tenant).is_err() {
                errors.push(ValidationError::new(
                    field("tenant_id"),
                    "contains characters not allowed in a header value",
                ));
            }
        }
    }

    if config.access_token.is_empty() {
        errors.push(ValidationError::new("access_token", "must not be empty"));
    }

    if config.port == 0 {
        errors.push(ValidationError::new("port", "must be a positive integer"));
    }

    if config.upstream.response_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.response_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.connect_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.upstream.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "upstream.max_body_bytes",
            "must be greater than 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
