//! Per-backend credential and tenant resolution.
//!
//! Both values are recomputed for every forwarded request from the
//! immutable configuration. Neither is ever logged.

use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::BackendConfig;

/// Tenant identity sent in the scope header: the explicit tenant override
/// when present and non-empty, otherwise the backend's org id.
pub fn resolve_tenant(backend: &BackendConfig) -> &str {
    match backend.tenant_id.as_deref() {
        Some(tenant) if !tenant.is_empty() => tenant,
        _ => &backend.org_id,
    }
}

/// Basic credentials for a backend: `Basic base64(org_id:access_token)`.
pub fn encode_credentials(backend: &BackendConfig, access_token: &str) -> String {
    let credentials = format!("{}:{}", backend.org_id, access_token);
    format!("Basic {}", STANDARD.encode(credentials))
}

/// Header value for the outbound `authorization` header, marked sensitive.
pub fn authorization_value(
    backend: &BackendConfig,
    access_token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&encode_credentials(backend, access_token))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Header value for the outbound tenant-scope header.
pub fn tenant_value(backend: &BackendConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(resolve_tenant(backend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn backend(org: &str, tenant: Option<&str>) -> BackendConfig {
        BackendConfig {
            url: Url::parse("https://example.com").unwrap(),
            org_id: org.to_string(),
            tenant_id: tenant.map(str::to_string),
        }
    }

    #[test]
    fn tenant_override_wins() {
        assert_eq!(resolve_tenant(&backend("123", Some("tenant-456"))), "tenant-456");
    }

    #[test]
    fn falls_back_to_org_id() {
        assert_eq!(resolve_tenant(&backend("123", None)), "123");
        assert_eq!(resolve_tenant(&backend("123", Some(""))), "123");
    }

    #[test]
    fn encodes_basic_credentials() {
        let header = encode_credentials(&backend("123", None), "secret-token");
        assert_eq!(header, "Basic MTIzOnNlY3JldC10b2tlbg==");

        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"123:secret-token");
    }

    #[test]
    fn credentials_ignore_tenant_override() {
        let header = encode_credentials(&backend("111", Some("prom-tenant")), "test-access-token");
        let decoded = STANDARD.decode(header.strip_prefix("Basic ").unwrap()).unwrap();
        assert_eq!(decoded, b"111:test-access-token");
    }

    #[test]
    fn authorization_value_is_sensitive() {
        let value = authorization_value(&backend("1", None), "t").unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value, "Basic MTp0");
    }
}
