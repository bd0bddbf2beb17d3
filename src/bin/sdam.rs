//! Sequential decision model CLI
//!
//! This CLI provides a unified interface for:
//! - Simulating governance episodes under a policy
//! - Searching policy parameters
//! - Comparing the reference policies
//! - Summarising Decision Arena playthroughs

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sdam")]
#[command(version, about = "Sequential decision model for AI-alert governance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one episode
    Simulate(sdam::cli::commands::simulate::SimulateArgs),

    /// Grid search over policy parameters
    Search(sdam::cli::commands::search::SearchArgs),

    /// Compare threshold and weighted-scoring policies
    Compare(sdam::cli::commands::compare::CompareArgs),

    /// Analyse Decision Arena exports
    Arena(sdam::cli::commands::arena::ArenaArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => sdam::cli::commands::simulate::execute(args),
        Commands::Search(args) => sdam::cli::commands::search::execute(args),
        Commands::Compare(args) => sdam::cli::commands::compare::execute(args),
        Commands::Arena(args) => sdam::cli::commands::arena::execute(args),
    }
}
