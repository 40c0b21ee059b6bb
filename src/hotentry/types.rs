//! Hot entry types for hotentry-rss.

use chrono::{DateTime, Utc};

/// Title used when the source omits one.
pub const UNTITLED: &str = "無題";

/// Description used when the source omits one.
pub const NO_DESCRIPTION: &str = "説明なし";

/// One bookmarked article, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Article title.
    pub title: String,
    /// Article URL (may be empty).
    pub url: String,
    /// Article description.
    pub description: String,
    /// Number of bookmarks.
    pub count: u64,
    /// Publication date in the source's own format. `None` means "use fetch time".
    pub date: Option<String>,
}

impl Entry {
    /// Create an entry with placeholder description and no date.
    pub fn new(title: impl Into<String>, url: impl Into<String>, count: u64) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: NO_DESCRIPTION.to_string(),
            count,
            date: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the source date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Whether this entry has at least `threshold` bookmarks.
    ///
    /// Negative thresholds admit everything.
    pub fn meets_threshold(&self, threshold: i64) -> bool {
        u64::try_from(threshold).map_or(true, |t| self.count >= t)
    }

    /// Feed item identifier: `{url}-{count}`.
    ///
    /// Not unique: the same URL with the same count collides, and the id
    /// changes whenever the count does.
    pub fn guid(&self) -> String {
        format!("{}-{}", self.url, self.count)
    }
}

/// The latest successfully fetched entry list.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Entries in source order.
    pub entries: Vec<Entry>,
    /// When the entries were fetched.
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Create a snapshot stamped with the current time.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self::with_time(entries, Utc::now())
    }

    /// Create a snapshot with an explicit fetch time.
    pub fn with_time(entries: Vec<Entry>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            entries,
            fetched_at,
        }
    }
}

/// Keep entries with `count >= threshold`, preserving order.
pub fn filter_by_threshold(entries: Vec<Entry>, threshold: i64) -> Vec<Entry> {
    entries
        .into_iter()
        .filter(|e| e.meets_threshold(threshold))
        .collect()
}
