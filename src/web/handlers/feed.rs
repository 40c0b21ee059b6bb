//! Feed handlers.

use axum::{
    extract::{OriginalUri, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use std::sync::Arc;

use super::AppState;
use crate::feed::{render_feed, FeedChannel};
use crate::hotentry::filter_by_threshold;
use crate::web::error::{FeedError, Xml};

/// Query parameters of the feed endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Minimum bookmark count, as sent by the client.
    pub threshold: Option<String>,
}

/// Parse the threshold parameter, falling back to `default` when it is
/// missing or not an integer.
pub fn parse_threshold(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// GET /hotentry/all/feed - Live hot entries as RSS, filtered by threshold.
///
/// Always fetches from upstream; the refresher's snapshot is not used here.
/// `/hotentry/all/feed/nocache` is served by the same handler.
pub async fn get_hotentry_feed(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    query: Option<Query<FeedQuery>>,
) -> Result<Xml, FeedError> {
    let raw_threshold = query.and_then(|Query(q)| q.threshold);
    let threshold = parse_threshold(raw_threshold.as_deref(), state.default_threshold);

    let entries = state.client.fetch().await?;
    let total = entries.len();
    let entries = filter_by_threshold(entries, threshold);
    tracing::debug!(threshold, total, shown = entries.len(), "Rendering hot entry feed");

    let site_url = state.site_root(&headers);
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let self_url = format!("{site_url}{path_and_query}");

    let channel = FeedChannel::new(threshold, self_url, site_url).with_ttl(state.ttl_minutes);
    let xml = render_feed(&entries, &channel)?;

    Ok(Xml::ok(xml))
}
