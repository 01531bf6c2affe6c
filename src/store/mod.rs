//! Event store for LogBuddy
//!
//! ## Architecture
//!
//! ```text
//! POST /logs ──────────────┐
//!                          ├──► EventStore::insert ──► log_entries (SQLite)
//! webhook worker pool ─────┘                                │
//!                                                           ▼
//!                 list / analytics / export ◄── EventStore::{query, all}
//! ```
//!
//! The store is append-only: there is no update or delete path.

pub mod database;
pub mod models;
pub mod query;

pub use database::{EventStore, StorageResult};
pub use models::{EventFilter, ExtraData, LogEvent, NewEvent};
pub use query::{EventQuery, DEFAULT_LIMIT};
