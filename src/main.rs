//! ResQ command-line entry point.
//!
//! Loads configuration, initializes logging, and dispatches to one of the
//! subcommands in [`commands`].

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use resq_core::config::AppConfig;
use resq_core::error::AppError;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(config).await {
        tracing::error!(error = %e, "Command failed");
        output::print_error(&e.user_message());
        std::process::exit(1);
    }
}

/// Load configuration from the config directory and environment.
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let env = std::env::var("RESQ_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(&cli.config_dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
