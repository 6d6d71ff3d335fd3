//! amoeba CLI - Command-line interface for the amoeba SAT heuristic.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "amoeba")]
#[command(author, version, about = "Amoeba-inspired stochastic SAT heuristic", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML file with default parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single CNF instance
    Solve(commands::solve::SolveArgs),
    /// Run repeated trials over a directory of instances and a sweep of eta values
    Trials(commands::trials::TrialsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = config::CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Solve(args) => commands::solve::run(args, &config),
        Commands::Trials(args) => commands::trials::run(args, &config),
    }
}
