//! hotentry-rss - Hatena Bookmark hot entries as a threshold-filtered RSS feed
//!
//! Fetches the hot entry list (JSON endpoint with an RDF fallback), keeps a
//! periodically refreshed snapshot, and serves RSS 2.0 over HTTP.

pub mod config;
pub mod datetime;
pub mod error;
pub mod feed;
pub mod hotentry;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{HotentryError, Result};
pub use feed::{render_error_feed, render_feed, FeedChannel};
pub use hotentry::{Entry, HatenaClient, Refresher, Snapshot, SnapshotCache};
pub use web::{AppState, WebServer};
