//! Command implementations for the CLI
//!
//! - start: run the HTTP server
//! - export: one-shot CSV export of the event store
//! - config: configuration display and validation

pub mod config;
pub mod export;
pub mod start;
