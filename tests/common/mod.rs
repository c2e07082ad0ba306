//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

use telemetry_gateway::config::{BackendConfig, ProxyConfig, Upstreams};
use telemetry_gateway::observability::metrics;
use telemetry_gateway::{HttpServer, Shutdown};

pub const ACCESS_TOKEN: &str = "test-access-token";

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What the mock backend answers with.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub content_type: Option<&'static str>,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: Some("application/json; charset=utf-8"),
            delay: Duration::ZERO,
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            content_type: None,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Mock backend that records every request it receives.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
    reply: Arc<Reply>,
}

impl MockBackend {
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    pub fn last(&self) -> Captured {
        self.requests().pop().expect("backend received no request")
    }
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_mock_backend(reply: Reply) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let backend = MockBackend {
        addr: listener.local_addr().unwrap(),
        captured: Arc::new(Mutex::new(Vec::new())),
        reply: Arc::new(reply),
    };

    let app = Router::new().fallback(capture).with_state(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    backend
}

async fn capture(State(backend): State<MockBackend>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    backend.captured.lock().unwrap().push(Captured {
        method: parts.method.to_string(),
        path_and_query: parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default(),
        headers: parts.headers,
        body,
    });

    let reply = backend.reply.as_ref();
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let mut response = Response::new(Body::from(reply.body.clone()));
    *response.status_mut() = StatusCode::from_u16(reply.status).unwrap();
    if let Some(content_type) = reply.content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type.parse().unwrap());
    }
    response
}

/// Configuration pointing every backend at `url`.
pub fn proxy_config(url: &Url) -> ProxyConfig {
    ProxyConfig::new(
        Upstreams {
            prometheus: BackendConfig::new(url.clone(), "111").with_tenant("prom-tenant"),
            loki: BackendConfig::new(url.clone(), "222"),
            tempo: BackendConfig::new(url.clone(), "333"),
            otlp: BackendConfig::new(url.clone(), "444"),
        },
        ACCESS_TOKEN,
    )
}

/// A proxy serving on an ephemeral port. Stops when dropped.
pub struct TestProxy {
    pub addr: SocketAddr,
    _shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self._shutdown.trigger();
    }
}

pub async fn start_proxy(config: ProxyConfig) -> TestProxy {
    let server = HttpServer::new(config, metrics::init_metrics()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestProxy {
        addr,
        _shutdown: shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn basic(org_id: &str) -> String {
    use base64::Engine;
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{org_id}:{ACCESS_TOKEN}"))
    )
}

/// Write a raw HTTP/1.1 request and read until the server closes.
///
/// Bypasses client-side URL normalization so the request target arrives
/// exactly as written.
pub async fn send_raw(addr: SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut buf = Vec::new();
    let _ = stream.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).into_owned()
}

/// A minimal `GET` request line with only a `host` header.
pub fn raw_get(target: &str) -> Vec<u8> {
    format!("GET {target} HTTP/1.1\r\nHost: proxy\r\nConnection: close\r\n\r\n").into_bytes()
}

/// Status code from a raw HTTP/1.1 response.
pub fn raw_status(response: &str) -> u16 {
    response
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap_or(0)
}

/// Find a sample in rendered exposition text by name and label subset.
pub fn sample_value(rendered: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    rendered.lines().find_map(|line| {
        let rest = line.strip_prefix(name)?;
        let (label_set, value) = match rest.strip_prefix('{') {
            Some(inner) => inner.split_once("} ")?,
            None => ("", rest.strip_prefix(' ')?),
        };
        let matches = labels
            .iter()
            .all(|(k, v)| label_set.contains(&format!("{k}=\"{v}\"")));
        if matches {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}
