//! E2E tests for the health check and basic server functionality

mod common;

use std::sync::atomic::Ordering;

use common::TestServer;
use serde_json::Value;

async fn health(server: &TestServer) -> (reqwest::StatusCode, Value) {
    let response = server
        .client
        .get(server.url("/api/health"))
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_health_check_reports_healthy_backend() {
    let server = TestServer::new().await;

    let (status, body) = health(&server).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["supabase"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["responseTime"].as_str().unwrap().ends_with("ms"));
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_health_check_degrades_when_query_fails() {
    let server = TestServer::new().await;
    server.supabase.data_api_down.store(true, Ordering::SeqCst);

    let (status, body) = health(&server).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["supabase"], "error");
}

#[tokio::test]
async fn test_health_check_degrades_when_backend_unreachable() {
    let server = TestServer::with_unreachable_supabase().await;

    let (status, body) = health(&server).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["supabase"], "error");
}

#[tokio::test]
async fn test_health_check_ignores_expired_session_cookie() {
    let server = TestServer::new().await;

    let response = server
        .get_with_cookies("/api/health", &[("sb-access-token", "expired")])
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["supabase"], "healthy");
}

#[tokio::test]
async fn test_cors_headers() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/health"))
        .header("Origin", "https://app.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://app.example.com")
    );
}

#[tokio::test]
async fn test_404_for_unknown_routes() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/unknown/route"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Resource not found");
}

#[tokio::test]
async fn test_metrics_endpoint_when_enabled() {
    let server = TestServer::new().await;
    health(&server).await;

    let response = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}
