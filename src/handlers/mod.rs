//! HTTP handlers
//!
//! Thin adapters between axum extractors and the store, analytics, export,
//! webhook and weather components. Every handler gets its collaborators from
//! [`AppState`]; nothing here holds global state.

pub mod analytics;
pub mod events;
pub mod export;
pub mod health;
pub mod metrics_handler;
pub mod webhook;
pub mod weather;

use crate::export::CsvExporter;
use crate::store::EventStore;
use crate::weather::WeatherClient;
use crate::webhook::WebhookQueue;

/// Shared state for the HTTP API
#[derive(Clone)]
pub struct AppState {
    pub store: EventStore,
    pub webhooks: WebhookQueue,
    pub exporter: CsvExporter,
    pub weather: WeatherClient,
    /// Optional cap on `limit` for event listing
    pub max_limit: Option<u64>,
}
