//! Forwarding engine.
//!
//! # Responsibilities
//! - Build the outbound request for a matched route
//! - Inject backend credentials and tenant scope
//! - Stream the request body up and the response back
//!
//! # Design Decisions
//! - One attempt per request: no retries, no buffering, no replay
//! - The outbound URI is assembled from parts and sent as-is; the path is
//!   never normalized or re-encoded
//! - Only the credential and tenant headers are added; the client adds
//!   `host` from the target URI and nothing else
//! - Redirects are returned to the caller, never followed
//! - Response head must arrive within the configured deadline (504 otherwise)

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Uri};
use axum::response::Response;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use url::{Position, Url};

use crate::config::{ProxyConfig, UpstreamConfig};
use crate::error::ProxyError;
use crate::http::response;
use crate::resilience::timeouts::with_response_timeout;
use crate::routing::RouteMatch;
use crate::security::{credentials, headers};

/// HTTP/HTTPS client used for every backend.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Forwards matched requests to their backend.
#[derive(Clone)]
pub struct Forwarder {
    client: UpstreamClient,
    config: Arc<ProxyConfig>,
    response_timeout: Duration,
}

impl Forwarder {
    pub fn new(config: Arc<ProxyConfig>) -> Result<Self, ProxyError> {
        Ok(Self {
            client: build_client(&config.upstream)?,
            response_timeout: Duration::from_secs(config.upstream.response_timeout_secs),
            config,
        })
    }

    /// Forward `request` to the backend selected by `matched`.
    ///
    /// Any status the backend returns, including 4xx and 5xx, is a success
    /// here. Only transport failures and timeouts are errors.
    pub async fn forward(
        &self,
        request: Request<Body>,
        matched: &RouteMatch<'_>,
    ) -> Result<Response, ProxyError> {
        let kind = matched.route.backend();
        let backend = self.config.backend(kind);

        let (parts, body) = request.into_parts();
        let target = upstream_uri(
            &backend.url,
            &matched.upstream_path_and_query(parts.uri.query()),
        )?;

        let access_token = self.config.access_token.expose();
        let authorization = credentials::authorization_value(backend, access_token)
            .map_err(|e| ProxyError::InvalidHeader(e.to_string()))?;
        let tenant = credentials::tenant_value(backend)
            .map_err(|e| ProxyError::InvalidHeader(e.to_string()))?;

        tracing::debug!(
            upstream = %kind,
            method = %parts.method,
            target_path = %target.path(),
            "Forwarding request"
        );

        let mut outbound = Request::new(body);
        *outbound.method_mut() = parts.method;
        *outbound.uri_mut() = target;
        *outbound.headers_mut() =
            headers::outbound_request_headers(&parts.headers, authorization, tenant);

        let upstream =
            with_response_timeout(self.response_timeout, self.client.request(outbound)).await?;
        Ok(response::from_upstream(upstream))
    }
}

/// Client with plain HTTP and rustls-backed HTTPS, HTTP/1.1 and HTTP/2.
///
/// Proxy environment variables are not consulted.
fn build_client(config: &UpstreamConfig) -> Result<UpstreamClient, ProxyError> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));

    let https = HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())
        .map_err(|e| ProxyError::RequestBuild(e.to_string()))?
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http);

    Ok(Client::builder(TokioExecutor::new()).build(https))
}

/// Join a backend base URL with an outbound path and query.
///
/// Scheme and authority come from the base URL. A path on the base URL is
/// kept as a prefix with its trailing slash dropped. `path_and_query` is
/// appended verbatim.
pub fn upstream_uri(base: &Url, path_and_query: &str) -> Result<Uri, ProxyError> {
    let authority = &base[Position::BeforeHost..Position::AfterPort];
    let base_path = base.path().trim_end_matches('/');

    Uri::builder()
        .scheme(base.scheme())
        .authority(authority)
        .path_and_query(format!("{base_path}{path_and_query}"))
        .build()
        .map_err(|e| ProxyError::RequestBuild(e.to_string()))
}
