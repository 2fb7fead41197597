//! Memclock CLI - Command-line interface
//!
//! Builds an overclocking session from catalog entries, applies tuning
//! flags, and runs stress tests or thermal reports against it.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use memclock_core::tracing_setup::{CliLogLevel, init_tracing};
use memclock_core::{MemclockConfig, MemclockError};

#[derive(Parser)]
#[command(name = "memclock")]
#[command(about = "A RAM overclocking simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,

    /// Directory for the full trace log
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    /// Seed for reproducible fault injection (overrides MEMCLOCK_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    let mut config = MemclockConfig::from_env();
    if let Some(seed) = cli.seed {
        config.simulation.deterministic_seed = Some(seed);
    }

    let result = commands::handle_command(cli.command, config, cli.json).await;
    if let Err(error) = &result {
        if let Some(error) = error.downcast_ref::<MemclockError>() {
            if error.is_user_error() {
                eprintln!("Error: {}", error.user_message());
                std::process::exit(2);
            }
        }
    }
    result
}
