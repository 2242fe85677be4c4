mod config;
mod engine;
mod error;
mod model;
mod stats;

use crate::config::Config;
use crate::engine::Engine;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    config: PathBuf,

    /// Override the seed set in the config file.
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Run,

    Check,
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

    let mut cfg = Config::from_file(&args.config).context("failed to construct cfg")?;
    if let Some(seed) = args.seed {
        cfg.init.seed = Some(seed);
    }
    log::info!("{cfg:#?}");

    match args.command {
        Command::Run => run_simulation(cfg)?,
        Command::Check => log::info!("config is valid"),
    }

    Ok(())
}

fn run_simulation(cfg: Config) -> Result<()> {
    let mut engine =
        Engine::generate_initial_condition(cfg).context("failed to generate initial condition")?;

    engine
        .perform_simulation()
        .context("failed to perform simulation")?;

    let outcome = engine.into_outcome();
    if outcome.n_env_clamps + outcome.n_host_clamps > 0 {
        log::warn!(
            "clamped {} environment and {} host updates",
            outcome.n_env_clamps,
            outcome.n_host_clamps
        );
    }
    log::info!("final environment {:.6}", outcome.env);

    println!("{:.6}", outcome.host_mean);

    Ok(())
}
