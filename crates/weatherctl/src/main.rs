//! weatherctl — one-shot queries against a weather scaler.
//!
//! # Usage
//!
//! ```text
//! weatherctl --config scaler.toml check
//! weatherctl --config scaler.toml metrics --name s0-weather
//! weatherctl --config scaler.toml spec
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "weatherctl",
    about = "WarpGrid weather scaler — query a temperature trigger once",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Scaler file (TOML) with a [metadata] table.
    #[arg(short, long, default_value = "scaler.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch once and report whether the trigger is active.
    Check,
    /// Fetch once and print the metric samples as JSON.
    Metrics {
        /// Metric name to report the sample under.
        #[arg(short, long, default_value = "weather")]
        name: String,
    },
    /// Print the metric spec as JSON. Does not contact the endpoint.
    Spec,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weatherctl=info,warpgrid_weather=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check => commands::check(&cli.config).await,
        Commands::Metrics { name } => commands::metrics(&cli.config, &name).await,
        Commands::Spec => commands::spec(&cli.config),
    }
}
