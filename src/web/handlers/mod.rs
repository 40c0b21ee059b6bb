//! HTTP handlers.

pub mod feed;
pub mod pages;

pub use feed::*;
pub use pages::*;

use axum::http::{header::HOST, HeaderMap};
use std::sync::Arc;

use crate::config::FeedConfig;
use crate::hotentry::{HatenaClient, SnapshotCache};

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upstream client used for every feed request.
    pub client: Arc<HatenaClient>,
    /// Snapshot kept fresh by the background refresher (help page only).
    pub cache: Arc<SnapshotCache>,
    /// Fixed site root; derived from request headers when `None`.
    pub public_url: Option<String>,
    /// Threshold used when the query parameter is missing or malformed.
    pub default_threshold: i64,
    /// Channel `<ttl>` in minutes.
    pub ttl_minutes: u32,
    /// Timezone for the help page's last-update time.
    pub timezone: String,
}

impl AppState {
    /// Create application state with default feed settings.
    pub fn new(client: Arc<HatenaClient>, cache: Arc<SnapshotCache>) -> Self {
        Self::with_feed_config(client, cache, &FeedConfig::default())
    }

    /// Create application state from feed configuration.
    pub fn with_feed_config(
        client: Arc<HatenaClient>,
        cache: Arc<SnapshotCache>,
        feed: &FeedConfig,
    ) -> Self {
        Self {
            client,
            cache,
            public_url: None,
            default_threshold: feed.default_threshold,
            ttl_minutes: feed.ttl_minutes,
            timezone: feed.timezone.clone(),
        }
    }

    /// Use a fixed public site root.
    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url;
        self
    }

    /// Site root without a trailing slash, e.g. `http://localhost:5001`.
    ///
    /// Prefers the configured public URL, then `X-Forwarded-*` headers, then
    /// the `Host` header.
    pub fn site_root(&self, headers: &HeaderMap) -> String {
        if let Some(public_url) = &self.public_url {
            return public_url.trim_end_matches('/').to_string();
        }

        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let scheme = header("x-forwarded-proto").unwrap_or("http");
        let host = header("x-forwarded-host")
            .or_else(|| header(HOST.as_str()))
            .unwrap_or("localhost");

        format!("{scheme}://{host}")
    }
}
