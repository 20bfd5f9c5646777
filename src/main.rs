//! plotrag CLI entry point.

use anyhow::Result;
use clap::Parser;
use plotrag::cli::{commands, Cli, Commands};
use plotrag::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // A missing .env file is fine; the key may come from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        e.exit();
    }

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("plotrag={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match cli.command {
        None => {
            commands::run_ask(&cli.ask, settings).await?;
        }

        Some(Commands::Ask(args)) => {
            commands::run_ask(&args, settings).await?;
        }

        Some(Commands::Ingest { dataset, limit, reset }) => {
            commands::run_ingest(dataset, limit, reset, settings).await?;
        }

        Some(Commands::Search { query, top_k }) => {
            commands::run_search(&query, top_k, settings).await?;
        }

        Some(Commands::Stats) => {
            commands::run_stats(settings).await?;
        }

        Some(Commands::Config { action }) => {
            commands::run_config(&action, config_path, settings)?;
        }
    }

    Ok(())
}
