use anyhow::Result;
use colored::Colorize;
use logbuddy::config::{self, Config};
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Prints the effective configuration (defaults, file and environment
/// merged) as TOML, with the weather API key masked.
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!(config = %config_path.display(), "Loading configuration for display");

    let cfg = config::load_config(config_path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", toml::to_string_pretty(&sanitized)?);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!("  {}: {}", "Database".cyan(), cfg.database.url);
    println!(
        "  {}: {} workers, capacity {}",
        "Webhook queue".cyan(),
        cfg.webhook.workers,
        cfg.webhook.queue_capacity
    );
    println!(
        "  {}: {}",
        "Export directory".cyan(),
        cfg.export.directory.display()
    );
    match cfg.query.max_limit {
        Some(max) => println!("  {}: {}", "Max page size".cyan(), max),
        None => println!("  {}: {}", "Max page size".cyan(), "unbounded".dimmed()),
    }

    info!("Configuration validation successful");
    Ok(())
}

fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    sanitized.weather.api_key = mask_api_key(&cfg.weather.api_key);
    sanitized
}

/// Show the first 4 and last 4 characters of a key
///
/// Example: "0123456789abcdef" -> "0123...cdef"
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }

    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", prefix, suffix)
}
