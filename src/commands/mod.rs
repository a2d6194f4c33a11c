//! CLI command definitions and dispatch.

pub mod access;
pub mod simulate;
pub mod weather;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use resq_core::config::AppConfig;
use resq_core::error::AppError;

/// ResQ — disaster relief request coordination
#[derive(Debug, Parser)]
#[command(name = "resq", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and per-environment overlays
    #[arg(short, long, default_value = "config")]
    pub config_dir: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a request lifecycle scenario against the in-memory backend
    Simulate(simulate::SimulateArgs),
    /// Show authorization gate decisions
    Access(access::AccessArgs),
    /// Fetch weather for a position
    Weather(weather::WeatherArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Simulate(args) => simulate::execute(args, config, self.format).await,
            Commands::Access(args) => access::execute(args, self.format),
            Commands::Weather(args) => weather::execute(args, &config, self.format).await,
        }
    }
}
