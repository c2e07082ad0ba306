//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with health, metrics and proxy handlers
//! - Wire up middleware (request ID, tracing, sensitive headers, body limit)
//! - Reject dot-segment paths, then dispatch to the route table
//! - Forward matched requests and instrument them
//! - Serve until the shutdown signal fires

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{sensitive_headers::SetSensitiveRequestHeadersLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::health;
use crate::http::proxy::Forwarder;
use crate::http::request;
use crate::observability::metrics::{self, RequestTimer};
use crate::routing::RouteTable;
use crate::security::{limits, paths};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub forwarder: Arc<Forwarder>,
    pub metrics: PrometheusHandle,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// `metrics` is the handle rendered by `GET /metrics`.
    pub fn new(config: ProxyConfig, metrics: PrometheusHandle) -> Result<Self, ProxyError> {
        let config = Arc::new(config);
        let forwarder = Arc::new(Forwarder::new(config.clone())?);

        let state = AppState {
            routes: Arc::new(RouteTable::standard()),
            forwarder,
            metrics,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health::liveness))
            .route("/ready", get(health::readiness))
            .route("/metrics", get(metrics_handler))
            .fallback(proxy_handler)
            .with_state(state)
            .layer(limits::body_limit_layer(&config.upstream))
            .layer(SetSensitiveRequestHeadersLayer::new([
                header::AUTHORIZATION,
                header::PROXY_AUTHORIZATION,
                header::COOKIE,
            ]))
            .layer(TraceLayer::new_for_http().make_span_with(request::make_request_span))
            .layer(request::propagate_request_id_layer())
            .layer(request::set_request_id_layer())
    }

    /// The assembled router, for serving on a custom listener or in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Looks up the route, forwards the request and records the outcome.
async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path().to_string();
    let request_id = request::request_id(&request).to_string();

    if paths::has_dot_segment(&path) {
        tracing::warn!(request_id = %request_id, path = %path, "Rejected path with dot segments");
        return ProxyError::InvalidPath(path).into_response();
    }

    let Some(matched) = state.routes.find(&path) else {
        tracing::warn!(request_id = %request_id, path = %path, "No route matched");
        return ProxyError::NoRouteMatched(path).into_response();
    };

    let upstream = matched.route.backend();
    let method = request.method().clone();
    let timer = RequestTimer::start(upstream, &method);

    let response = match state.forwarder.forward(request, &matched).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                upstream = %upstream,
                method = %method,
                error_type = e.error_type(),
                error = %e,
                "Upstream error"
            );
            e.into_response()
        }
    };

    let status = response.status();
    timer.finish(status);

    tracing::debug!(
        request_id = %request_id,
        upstream = %upstream,
        method = %method,
        status = status.as_u16(),
        "Request proxied"
    );

    response
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    metrics::exposition(&state.metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use url::Url;

    use crate::config::{BackendConfig, Upstreams};

    fn test_server() -> HttpServer {
        let url = Url::parse("http://127.0.0.1:9").unwrap();
        let config = ProxyConfig::new(
            Upstreams {
                prometheus: BackendConfig::new(url.clone(), "1"),
                loki: BackendConfig::new(url.clone(), "2"),
                tempo: BackendConfig::new(url.clone(), "3"),
                otlp: BackendConfig::new(url, "4"),
            },
            "t",
        );
        let handle = metrics::build_recorder().unwrap().handle();
        HttpServer::new(config, handle).unwrap()
    }

    #[tokio::test]
    async fn health_is_served_locally() {
        let res = test_server()
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn unmatched_path_is_404() {
        let res = test_server()
            .router()
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dot_segment_path_is_400() {
        for path in ["/loki/../admin", "/api/prom/./push", "/tempo/%2e%2e/x"] {
            let res = test_server()
                .router()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "path {path}");
        }
    }

    #[tokio::test]
    async fn metrics_uses_exposition_content_type() {
        let res = test_server()
            .router()
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            metrics::EXPOSITION_CONTENT_TYPE
        );
    }
}
