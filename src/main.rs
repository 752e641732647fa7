mod manager;

use crate::manager::Manager;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Seed of the career simulations (overrides the config).
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Single-year career choice from peer information only.
    Baseline,

    /// Two-year career choice with belief revision and switching costs.
    Switching,

    /// Market-clearing price of the exchange economy.
    Exchange,

    /// Welfare-maximizing tax of the labor economy.
    Tax,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(&args.config, args.seed).context("failed to construct mgr")?;

    let report = match args.command {
        Command::Baseline => mgr.run_baseline()?,
        Command::Switching => mgr.run_switching()?,
        Command::Exchange => mgr.run_exchange()?,
        Command::Tax => mgr.run_tax()?,
    };
    print!("{report}");

    Ok(())
}
