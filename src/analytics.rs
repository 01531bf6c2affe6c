//! Analytics over the full event set
//!
//! Level/source histograms cover every stored event. Recent activity is the
//! tail of the trailing 24-hour window, kept in ascending time order (oldest
//! of the ten first).

use crate::store::{EventStore, LogEvent, StorageResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Trailing window for recent activity, in hours
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Maximum number of recent-activity entries
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Aggregate view of the event store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    #[serde(rename = "total_logs")]
    pub total: u64,

    #[serde(rename = "logs_by_level")]
    pub by_level: HashMap<String, u64>,

    #[serde(rename = "logs_by_source")]
    pub by_source: HashMap<String, u64>,

    pub recent_activity: Vec<ActivityRecord>,
}

impl AnalyticsReport {
    pub fn empty() -> Self {
        Self {
            total: 0,
            by_level: HashMap::new(),
            by_source: HashMap::new(),
            recent_activity: Vec::new(),
        }
    }
}

/// Projection of an event shown in recent activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub source: String,
    pub message: String,
}

impl From<&LogEvent> for ActivityRecord {
    fn from(event: &LogEvent) -> Self {
        Self {
            id: event.id,
            timestamp: event.timestamp,
            level: event.level.clone(),
            source: event.source.clone(),
            message: event.message.clone(),
        }
    }
}

/// Compute the report for `events` (in insertion order) as seen at `now`
pub fn summarize(events: &[LogEvent], now: DateTime<Utc>) -> AnalyticsReport {
    if events.is_empty() {
        return AnalyticsReport::empty();
    }

    let mut by_level: HashMap<String, u64> = HashMap::new();
    let mut by_source: HashMap<String, u64> = HashMap::new();
    for event in events {
        *by_level.entry(event.level.clone()).or_default() += 1;
        *by_source.entry(event.source.clone()).or_default() += 1;
    }

    let cutoff = now - Duration::hours(RECENT_WINDOW_HOURS);
    let mut window: Vec<&LogEvent> = events.iter().filter(|e| e.timestamp >= cutoff).collect();
    // Stable: ties keep insertion order
    window.sort_by_key(|e| e.timestamp);

    let tail_start = window.len().saturating_sub(RECENT_ACTIVITY_LIMIT);
    let recent_activity = window[tail_start..]
        .iter()
        .map(|e| ActivityRecord::from(*e))
        .collect();

    AnalyticsReport {
        total: events.len() as u64,
        by_level,
        by_source,
        recent_activity,
    }
}

/// Scan the store once and summarize it
pub async fn generate_report(store: &EventStore) -> StorageResult<AnalyticsReport> {
    tracing::info!("Generating analytics report...");
    let start = Instant::now();

    let events = store.all().await?;
    let report = summarize(&events, Utc::now());

    tracing::info!(
        total = report.total,
        levels = report.by_level.len(),
        sources = report.by_source.len(),
        recent = report.recent_activity.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Analytics report generated"
    );

    Ok(report)
}
