use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // `start` sets up its own file-backed logging once the config is loaded
    match args.get_command() {
        cli::Commands::Start => {
            commands::start::execute(&args.config).await?;
        }
        cli::Commands::Export { output_dir } => {
            logbuddy::init_console_tracing();
            commands::export::execute(&args.config, output_dir).await?;
        }
        cli::Commands::Config { action } => {
            logbuddy::init_console_tracing();
            match action {
                cli::ConfigCommands::Show => commands::config::show(&args.config)?,
                cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
            }
        }
        cli::Commands::Version => {
            println!("LogBuddy v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
