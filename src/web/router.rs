//! Router configuration.

use axum::{
    http::{header::CACHE_CONTROL, HeaderValue},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use super::handlers::{debug_ifttt, get_hotentry_feed, index, AppState};

/// Create the main router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Feed readers must not cache these responses
    let feed_routes = Router::new()
        .route("/hotentry/all/feed", get(get_hotentry_feed))
        .route("/hotentry/all/feed/nocache", get(get_hotentry_feed))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ));

    let page_routes = Router::new()
        .route("/", get(index))
        .route("/debug/ifttt", get(debug_ifttt));

    Router::new()
        .merge(feed_routes)
        .merge(page_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
        .merge(create_health_router())
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
