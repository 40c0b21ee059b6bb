//! Background refresher for the snapshot cache.
//!
//! Runs once eagerly at startup, then on a fixed interval. A failed cycle
//! leaves the cache untouched and simply waits for the next tick.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::hotentry::cache::SnapshotCache;
use crate::hotentry::fetcher::HatenaClient;
use crate::hotentry::types::Snapshot;

/// Default refresh interval in seconds (5 minutes).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Periodic hot entry refresher.
pub struct Refresher {
    client: Arc<HatenaClient>,
    cache: Arc<SnapshotCache>,
    refresh_interval: Duration,
    /// Serializes refresh cycles so at most one publishes at a time.
    cycle: Mutex<()>,
}

impl Refresher {
    /// Create a refresher with the default interval.
    pub fn new(client: Arc<HatenaClient>, cache: Arc<SnapshotCache>) -> Self {
        Self::with_interval(client, cache, DEFAULT_REFRESH_INTERVAL_SECS)
    }

    /// Create a refresher with a custom interval.
    pub fn with_interval(
        client: Arc<HatenaClient>,
        cache: Arc<SnapshotCache>,
        interval_secs: u64,
    ) -> Self {
        Self {
            client,
            cache,
            refresh_interval: Duration::from_secs(interval_secs),
            cycle: Mutex::new(()),
        }
    }

    /// Refresh interval.
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Run one fetch-and-publish cycle.
    ///
    /// On success the cache holds a new snapshot and the entry count is
    /// returned. On failure the cache is not modified.
    pub async fn refresh_once(&self) -> Result<usize> {
        let _cycle = self.cycle.lock().await;
        debug!("Refreshing hot entries");

        let entries = self.client.fetch().await?;
        let count = entries.len();
        self.cache.set(Snapshot::new(entries)).await;

        Ok(count)
    }

    /// Run one cycle and log the outcome instead of returning it.
    pub async fn refresh_logged(&self) {
        match self.refresh_once().await {
            Ok(count) => info!(entries = count, "Hot entry snapshot updated"),
            Err(e) => error!(error = %e, "Failed to refresh hot entries; keeping previous snapshot"),
        }
    }

    /// Run the refresh loop forever.
    ///
    /// The first cycle happens one full interval after the call; the eager
    /// startup fetch is the caller's job (see [`Refresher::refresh_logged`]).
    pub async fn run(&self) {
        info!(
            "Hot entry refresher started (interval: {} seconds)",
            self.refresh_interval.as_secs()
        );

        let mut timer = interval(self.refresh_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Skip the first immediate tick
        timer.tick().await;

        loop {
            timer.tick().await;
            self.refresh_logged().await;
        }
    }
}

/// Run the eager startup refresh, then spawn the periodic loop.
///
/// A failed startup refresh is logged and does not prevent the loop from
/// starting.
pub async fn start_refresher(refresher: Arc<Refresher>) -> JoinHandle<()> {
    refresher.refresh_logged().await;
    tokio::spawn(async move {
        refresher.run().await;
    })
}
