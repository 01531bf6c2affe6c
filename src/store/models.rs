//! Event record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured key-value payload attached to an event
pub type ExtraData = Map<String, Value>;

/// Insert request for the event store
///
/// `id` is always assigned by the store; `timestamp` is assigned at insert
/// time unless the caller supplies one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub level: String,
    pub message: String,
    pub source: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
    #[serde(skip)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewEvent {
    pub fn new(
        level: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
            source: source.into(),
            user_id: None,
            extra_data: None,
            timestamp: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_extra_data(mut self, extra_data: ExtraData) -> Self {
        self.extra_data = Some(extra_data);
        self
    }

    /// Pin the creation instant instead of using the insert time
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A persisted, immutable log event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub message: String,
    pub source: String,
    pub user_id: Option<String>,
    pub extra_data: Option<Value>,
}

/// Equality predicates over `level` and `source`
///
/// `None` means no restriction on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub level: Option<String>,
    pub source: Option<String>,
}
