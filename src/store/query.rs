//! Query API for stored events
//!
//! Translates optional level/source filters and skip/limit pagination into
//! a store read.

use super::database::{EventStore, StorageResult};
use super::models::{EventFilter, LogEvent};
use serde::Deserialize;

/// Default page size when the caller does not give one
pub const DEFAULT_LIMIT: u64 = 100;

/// Paginated event listing request
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventQuery {
    /// Exact-match filter on level
    pub level: Option<String>,

    /// Exact-match filter on source
    pub source: Option<String>,

    /// Matching events to skip
    #[serde(default)]
    pub skip: u64,

    /// Maximum events to return; 0 yields an empty page
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            level: None,
            source: None,
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl EventQuery {
    /// Build the store filter; empty strings count as "no filter"
    pub fn filter(&self) -> EventFilter {
        EventFilter {
            level: self.level.clone().filter(|l| !l.is_empty()),
            source: self.source.clone().filter(|s| !s.is_empty()),
        }
    }

    /// Cap the page size when a maximum is configured
    pub fn capped(mut self, max_limit: Option<u64>) -> Self {
        if let Some(max) = max_limit {
            self.limit = self.limit.min(max);
        }
        self
    }
}

impl EventStore {
    /// List events with optional filtering and pagination
    ///
    /// # Example
    ///
    /// ```ignore
    /// let query = EventQuery {
    ///     level: Some("ERROR".to_string()),
    ///     limit: 10,
    ///     ..Default::default()
    /// };
    /// let events = store.list(&query).await?;
    /// ```
    pub async fn list(&self, query: &EventQuery) -> StorageResult<Vec<LogEvent>> {
        let events = self.query(&query.filter(), query.skip, query.limit).await?;
        tracing::info!(
            count = events.len(),
            level = ?query.level,
            source = ?query.source,
            "Retrieved log entries"
        );
        Ok(events)
    }
}
