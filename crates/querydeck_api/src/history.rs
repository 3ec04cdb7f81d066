use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{TableData, config::ConnectionConfig};

/// Default number of executed queries kept
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// One executed query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub collection: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(
        query: &str,
        config: &ConnectionConfig,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            query: query.to_string(),
            kind: config.kind.to_string(),
            collection: config.collection.clone(),
            timestamp,
        }
    }
}

impl TableData for HistoryEntry {
    fn title() -> &'static str {
        "Query History"
    }

    fn ref_array(&self) -> Vec<String> {
        vec![
            self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.kind.clone(),
            self.collection.clone(),
            self.query.replace('\n', " "),
        ]
    }

    fn num_columns(&self) -> usize {
        4
    }

    fn cols() -> Vec<&'static str> {
        vec!["Time", "Type", "Collection", "Query"]
    }
}

/// Executed queries, newest first, never longer than `limit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHistory {
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_HISTORY_LIMIT)
    }
}

impl QueryHistory {
    /// Wrap previously stored entries, trimming them to `limit`.
    ///
    /// A limit of zero is treated as one.
    #[must_use]
    pub fn new(mut entries: Vec<HistoryEntry>, limit: usize) -> Self {
        let limit = limit.max(1);
        entries.truncate(limit);
        Self { entries, limit }
    }

    /// Prepend an entry for `query` and drop whatever falls past the limit
    pub fn record(
        &mut self,
        query: &str,
        config: &ConnectionConfig,
        timestamp: DateTime<Utc>,
    ) {
        self.entries
            .insert(0, HistoryEntry::new(query, config, timestamp));
        self.entries.truncate(self.limit);
        tracing::debug!(len = self.entries.len(), "Recorded query in history");
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
