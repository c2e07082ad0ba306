//! Backend traffic ignores ambient proxy environment variables.
//!
//! Kept in its own test binary since it mutates the process environment.

use axum::http::StatusCode;

mod common;

use common::{basic, client, proxy_config, start_mock_backend, start_proxy, Reply};

#[tokio::test]
async fn proxy_env_vars_are_not_used_for_backends() {
    let backend = start_mock_backend(Reply::json(200, "{}")).await;
    let decoy = start_mock_backend(Reply::empty(502)).await;

    let decoy_url = format!("http://{}", decoy.addr);
    for var in ["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY"] {
        std::env::set_var(var, &decoy_url);
    }
    std::env::remove_var("NO_PROXY");
    std::env::remove_var("no_proxy");

    let proxy = start_proxy(proxy_config(&backend.url())).await;
    let res = client()
        .get(proxy.url("/loki/loki/api/v1/labels"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(decoy.requests().is_empty());
    assert_eq!(backend.last().headers["authorization"], basic("222"));
}
