//! LogBuddy - log ingestion and analytics service
//!
//! Ingests structured log events and ad-hoc webhook payloads into an
//! append-only SQLite store and serves filtered listing, analytics and CSV
//! export over them.
//!
//! # Modules
//!
//! - `store`: append-only event store and paginated queries
//! - `analytics`: level/source histograms and the recent-activity window
//! - `export`: CSV export of the full event set
//! - `webhook`: fire-and-forget webhook ingestion worker pool
//! - `weather`: external weather passthrough
//! - `handlers` / `server`: HTTP surface

pub mod analytics;
pub mod config;
pub mod error;
pub mod export;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod signals;
pub mod store;
pub mod weather;
pub mod webhook;

pub use analytics::{AnalyticsReport, ActivityRecord};
pub use error::{AppError, ExportError, SerializationError, StorageError, WebhookError};
pub use export::{CsvExporter, ExportResult};
pub use logging::{init_console_tracing, init_tracing};
pub use store::{EventFilter, EventQuery, EventStore, LogEvent, NewEvent};
pub use webhook::{WebhookQueue, WebhookWorkers};
