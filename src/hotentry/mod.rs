//! Hot entry source, snapshot cache and background refresher.

pub mod cache;
pub mod fetcher;
pub mod parser;
pub mod types;
pub mod updater;

pub use cache::SnapshotCache;
pub use fetcher::{Endpoint, HatenaClient};
pub use parser::{parse_api_json, parse_rdf_feed};
pub use types::{filter_by_threshold, Entry, Snapshot, NO_DESCRIPTION, UNTITLED};
pub use updater::{start_refresher, Refresher, DEFAULT_REFRESH_INTERVAL_SECS};
