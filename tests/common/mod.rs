//! Test helpers for the HTTP integration tests.
//!
//! Provides a mock upstream (JSON endpoint and RDF feed) and a TestServer
//! wired to it.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hotentry_rss::config::SourceConfig;
use hotentry_rss::web::create_router;
use hotentry_rss::{AppState, HatenaClient, SnapshotCache};

pub const API_PATH: &str = "/entry/jsonlite/hotentry";
pub const RSS_PATH: &str = "/hotentry.rss";

/// Three entries with counts 50, 150 and 300.
pub const API_BODY: &str = r#"[
    {"title": "Low", "url": "https://low.example/", "description": "low entry", "count": 50, "date": "2024-01-15T10:30:00+09:00"},
    {"title": "Mid", "url": "https://mid.example/", "description": "mid & entry", "count": "150"},
    {"title": "High", "link": "https://high.example/", "count": 300}
]"#;

pub const RDF_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns="http://purl.org/rss/1.0/"
         xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dc="http://purl.org/dc/elements/1.1/"
         xmlns:hatena="http://www.hatena.ne.jp/info/xmlns#">
  <channel rdf:about="https://b.hatena.ne.jp/hotentry">
    <title>hot entries</title>
    <link>https://b.hatena.ne.jp/hotentry</link>
    <description>hot entries</description>
  </channel>
  <item rdf:about="https://rdf.example/">
    <title>From RDF</title>
    <link>https://rdf.example/</link>
    <description>fallback entry</description>
    <dc:date>2024-01-15T10:30:00+09:00</dc:date>
    <hatena:bookmarkcount>250</hatena:bookmarkcount>
  </item>
</rdf:RDF>"#;

/// Source configuration pointing at the mock upstream.
pub fn source_config(upstream: &MockServer) -> SourceConfig {
    SourceConfig {
        primary_url: format!("{}{}", upstream.uri(), API_PATH),
        fallback_url: format!("{}{}", upstream.uri(), RSS_PATH),
        timeout_secs: 2,
        user_agents: vec!["integration-test".to_string()],
    }
}

/// Mount a response for the JSON endpoint.
pub async fn mount_api(upstream: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(response)
        .mount(upstream)
        .await;
}

/// Mount a response for the RDF feed.
pub async fn mount_rss(upstream: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(RSS_PATH))
        .respond_with(response)
        .mount(upstream)
        .await;
}

/// Application state backed by the mock upstream.
pub fn app_state(upstream: &MockServer) -> Arc<AppState> {
    let client = Arc::new(HatenaClient::new(&source_config(upstream)).expect("client"));
    Arc::new(AppState::new(client, Arc::new(SnapshotCache::new())))
}

/// Create a test server for the given state.
pub fn test_server(state: Arc<AppState>) -> TestServer {
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

/// Item titles in document order.
pub fn item_titles(xml: &str) -> Vec<String> {
    xml.split("<item>")
        .skip(1)
        .filter_map(|item| {
            let start = item.find("<title>")? + "<title>".len();
            let end = item.find("</title>")?;
            Some(item[start..end].to_string())
        })
        .collect()
}
