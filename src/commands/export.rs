use anyhow::{Context, Result};
use colored::Colorize;
use logbuddy::{config, CsvExporter, EventStore};
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute the export command
///
/// Writes every stored event to a timestamped CSV file without starting the
/// server. `output_dir` overrides `export.directory`.
pub async fn execute(config_path: &Path, output_dir: Option<PathBuf>) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let directory = output_dir.unwrap_or(cfg.export.directory);

    println!(
        "{}",
        format!("Exporting events from {}...", cfg.database.url).yellow()
    );

    let store = EventStore::connect(&cfg.database.url, cfg.database.max_connections)
        .await
        .with_context(|| format!("Failed to open event store at {}", cfg.database.url))?;

    let result = CsvExporter::new(&directory)
        .export(&store)
        .await
        .context("Failed to export logs")?;

    info!(
        filename = %result.filename,
        records = result.record_count,
        "Export finished"
    );

    println!("{}", "✓ Export completed".green());
    println!("  {}: {}", "File".cyan(), result.path.display());
    println!("  {}: {}", "Records".cyan(), result.record_count);

    Ok(())
}
