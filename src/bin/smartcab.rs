//! Smartcab CLI - train and evaluate the Q-learning driving agent

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "smartcab")]
#[command(version, about = "Q-learning smartcab driving agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the learning agent, then evaluate it on testing trials
    Train(smartcab::cli::commands::train::TrainArgs),

    /// Drive with the non-learning random baseline
    Baseline(smartcab::cli::commands::baseline::BaselineArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => smartcab::cli::commands::train::execute(args),
        Commands::Baseline(args) => smartcab::cli::commands::baseline::execute(args),
    }
}
