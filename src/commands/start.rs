use anyhow::Result;
use colored::Colorize;
use logbuddy::{config, init_tracing, server};
use std::path::Path;
use tracing::info;

/// Execute the start command
///
/// Loads configuration, installs logging from the `[logging]` section and
/// serves until a shutdown signal arrives.
pub async fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Starting LogBuddy...".green());

    let cfg = config::load_config(config_path)?;

    // Held until the server returns so file writers flush on exit
    let _logging = init_tracing(&cfg.logging)?;

    info!(
        config = %config_path.display(),
        version = env!("CARGO_PKG_VERSION"),
        "Starting LogBuddy"
    );

    server::start_server(cfg).await
}
