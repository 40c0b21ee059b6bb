//! Shared snapshot cache.
//!
//! Holds the most recent successfully fetched [`Snapshot`] behind an `Arc`.
//! Writers replace the whole `Arc`; readers clone it and never observe a
//! partially written snapshot.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::hotentry::types::Snapshot;

/// Thread-safe holder of the latest snapshot.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, or `None` before the first successful fetch.
    pub async fn get(&self) -> Option<Arc<Snapshot>> {
        self.current.read().await.clone()
    }

    /// Replace the current snapshot.
    pub async fn set(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        *self.current.write().await = Some(snapshot);
    }
}
