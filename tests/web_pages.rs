//! Help page, debug page and health check tests.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use wiremock::{MockServer, ResponseTemplate};

use common::*;
use hotentry_rss::Refresher;

#[tokio::test]
async fn test_health() {
    let upstream = MockServer::start().await;
    let server = test_server(app_state(&upstream));

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    response.assert_text("OK");
}

#[tokio::test]
async fn test_index_before_first_refresh() {
    let upstream = MockServer::start().await;
    let server = test_server(app_state(&upstream));

    let response = server.get("/").await;
    response.assert_status(StatusCode::OK);
    let html = response.text();
    assert!(html.contains("最終更新: 更新情報なし"));
    assert!(html.contains("/hotentry/all/feed?threshold=500"));
}

#[tokio::test]
async fn test_index_after_refresh() {
    let upstream = MockServer::start().await;
    mount_api(&upstream, ResponseTemplate::new(200).set_body_string(API_BODY)).await;

    let state = app_state(&upstream);
    let refresher = Refresher::new(state.client.clone(), state.cache.clone());
    assert_eq!(refresher.refresh_once().await.unwrap(), 3);

    let server = test_server(Arc::clone(&state));
    let html = server.get("/").await.text();
    assert!(!html.contains("更新情報なし"));
    assert!(html.contains("最終更新: 20"));
}

#[tokio::test]
async fn test_debug_ifttt() {
    let upstream = MockServer::start().await;
    let server = test_server(app_state(&upstream));

    let response = server.get("/debug/ifttt").await;
    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("/hotentry/all/feed?threshold=200"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let upstream = MockServer::start().await;
    let server = test_server(app_state(&upstream));

    server
        .get("/hotentry/all/rss")
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
