//! CSV export of the full event set
//!
//! Columns are fixed: `id, timestamp, level, message, source, user_id`.
//! `extra_data` is never exported.

use crate::error::ExportError;
use crate::store::{EventStore, LogEvent};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header row, in column order
pub const EXPORT_COLUMNS: [&str; 6] = ["id", "timestamp", "level", "message", "source", "user_id"];

/// Outcome of a finished export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportResult {
    /// Rows written, excluding the header
    pub record_count: usize,
    /// File name of the artifact inside the export directory
    pub filename: String,
    /// Full path of the artifact
    #[serde(skip)]
    pub path: PathBuf,
}

/// Writes export files into one destination directory
#[derive(Debug, Clone)]
pub struct CsvExporter {
    directory: PathBuf,
}

impl CsvExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Export every stored event to a new timestamped CSV file
    ///
    /// File names have second resolution; two exports within the same second
    /// target the same name and the later one wins.
    pub async fn export(&self, store: &EventStore) -> Result<ExportResult, ExportError> {
        tracing::info!(directory = %self.directory.display(), "Exporting logs to CSV...");

        let events = store.all().await?;
        let filename = export_filename(Utc::now());
        let path = self.directory.join(&filename);

        let write_path = path.clone();
        let record_count =
            tokio::task::spawn_blocking(move || write_csv_file(&write_path, &events)).await??;

        crate::metrics::record_export(record_count);
        tracing::info!(file = %path.display(), records = record_count, "Logs exported");

        Ok(ExportResult {
            record_count,
            filename,
            path,
        })
    }
}

/// `logs_export_YYYYmmdd_HHMMSS.csv`
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("logs_export_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

fn write_csv_file(path: &Path, events: &[LogEvent]) -> Result<usize, ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    let count = write_csv(&mut file, events)?;
    file.sync_all()?;

    Ok(count)
}

/// Encode `events` as CSV with a header row; returns the number of data rows
pub fn write_csv<W: Write>(writer: W, events: &[LogEvent]) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_COLUMNS)?;

    for event in events {
        let id = event.id.to_string();
        let timestamp = event.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true);
        csv_writer.write_record([
            id.as_str(),
            timestamp.as_str(),
            event.level.as_str(),
            event.message.as_str(),
            event.source.as_str(),
            event.user_id.as_deref().unwrap_or(""),
        ])?;
    }

    csv_writer.flush()?;
    Ok(events.len())
}
