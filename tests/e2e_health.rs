//! E2E tests for the health and metrics endpoints

mod common;

use common::TestServer;

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "OK");
}

#[tokio::test]
async fn test_metrics_endpoint_renders_prometheus_text() {
    let server = TestServer::new().await;
    server.signup("alice", "pw1").await;

    let response = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains("frontdesk_signup_attempts_total"));
    assert!(body.contains("frontdesk_users_registered"));
}

#[tokio::test]
async fn test_login_page_is_served_statically() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/login.html"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains("<form method=\"post\" action=\"/login\">"));
}
