//! SQLite-backed append-only event store
//!
//! - Connection pooling (one scoped connection per operation)
//! - Automatic migrations
//! - WAL mode for concurrent reads/writes
//!
//! Ids come from `INTEGER PRIMARY KEY AUTOINCREMENT`, so SQLite's single
//! writer lock serializes id assignment and ids are never reused.

use super::models::{EventFilter, LogEvent, NewEvent};
use crate::error::{SerializationError, StorageError};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::str::FromStr;
use std::time::{Duration, Instant};

pub type StorageResult<T> = Result<T, StorageError>;

const SELECT_COLUMNS: &str =
    "SELECT id, timestamp, level, message, source, user_id, extra_data FROM log_entries";

/// Event store handle
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct EventStore {
    pool: SqlitePool,
}

impl EventStore {
    /// Open (or create) the database and run migrations
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = EventStore::connect("sqlite:./logbuddy.db", 5).await?;
    /// ```
    pub async fn connect(database_url: &str, max_connections: u32) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30))
            .pragma("synchronous", "NORMAL");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Single-connection in-memory store
    ///
    /// Every pooled connection to `sqlite::memory:` would get its own empty
    /// database, so the pool is pinned to one connection that never expires.
    pub async fn in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> StorageResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Event store migrations completed");
        Ok(Self { pool })
    }

    /// Append an event, assigning its id and timestamp
    ///
    /// The row is written by a single statement, so no reader can observe it
    /// partially populated.
    pub async fn insert(&self, event: NewEvent) -> StorageResult<LogEvent> {
        let start = Instant::now();
        let timestamp = event.timestamp.unwrap_or_else(Utc::now);
        let extra_data = event
            .extra_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(SerializationError::from)?;

        let row = sqlx::query(
            "INSERT INTO log_entries (timestamp, level, message, source, user_id, extra_data)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id, timestamp, level, message, source, user_id, extra_data",
        )
        .bind(timestamp.timestamp_millis())
        .bind(&event.level)
        .bind(&event.message)
        .bind(&event.source)
        .bind(&event.user_id)
        .bind(&extra_data)
        .fetch_one(&self.pool)
        .await?;

        let stored = row_to_event(&row)?;
        crate::metrics::record_store_operation("insert", start.elapsed());
        tracing::debug!(id = stored.id, level = %stored.level, source = %stored.source, "Stored log event");

        Ok(stored)
    }

    /// Filtered range read ordered by id ascending
    ///
    /// Skips `offset` matching rows, then returns at most `limit`.
    pub async fn query(
        &self,
        filter: &EventFilter,
        offset: u64,
        limit: u64,
    ) -> StorageResult<Vec<LogEvent>> {
        self.fetch(filter, offset, Some(limit)).await
    }

    /// Unfiltered full scan in insertion order
    pub async fn all(&self) -> StorageResult<Vec<LogEvent>> {
        self.fetch(&EventFilter::default(), 0, None).await
    }

    /// Number of stored events
    pub async fn count(&self) -> StorageResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM log_entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn fetch(
        &self,
        filter: &EventFilter,
        offset: u64,
        limit: Option<u64>,
    ) -> StorageResult<Vec<LogEvent>> {
        let start = Instant::now();
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        builder.push(" WHERE 1=1");

        if let Some(level) = &filter.level {
            builder.push(" AND level = ").push_bind(level.clone());
        }
        if let Some(source) = &filter.source {
            builder.push(" AND source = ").push_bind(source.clone());
        }

        builder.push(" ORDER BY id ASC");

        // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded
        let limit = limit.map_or(-1, clamp_i64);
        builder.push(" LIMIT ").push_bind(limit);
        builder.push(" OFFSET ").push_bind(clamp_i64(offset));

        let rows = builder.build().fetch_all(&self.pool).await?;
        let events = rows.iter().map(row_to_event).collect::<StorageResult<Vec<_>>>()?;

        let operation = if filter == &EventFilter::default() && limit < 0 {
            "scan"
        } else {
            "query"
        };
        crate::metrics::record_store_operation(operation, start.elapsed());

        Ok(events)
    }

    /// Close every pooled connection, waiting for in-flight operations
    ///
    /// All clones share the pool, so the whole store is closed.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Event store closed");
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn row_to_event(row: &SqliteRow) -> StorageResult<LogEvent> {
    let millis: i64 = row.try_get("timestamp")?;
    let timestamp =
        DateTime::<Utc>::from_timestamp_millis(millis).ok_or(StorageError::InvalidTimestamp(millis))?;

    let extra_data = row
        .try_get::<Option<String>, _>("extra_data")?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(SerializationError::from)?;

    Ok(LogEvent {
        id: row.try_get("id")?,
        timestamp,
        level: row.try_get("level")?,
        message: row.try_get("message")?,
        source: row.try_get("source")?,
        user_id: row.try_get("user_id")?,
        extra_data,
    })
}
