//! Baseline command - drive with the non-learning random policy

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    agent::DrivingAgent,
    app::AgentConfig,
    cli::{commands::train::write_summary, output},
    pipeline::{CsvObserver, ProgressObserver, Simulation, SimulationConfig},
    sim::{TrafficWorld, WorldConfig},
};

#[derive(Parser, Debug)]
#[command(about = "Drive the naive random baseline (no learning)")]
pub struct BaselineArgs {
    /// Number of trials to drive
    #[arg(long, short = 't', default_value_t = 100)]
    pub trials: usize,

    /// Route legs per destination
    #[arg(long, default_value_t = 5)]
    pub route_legs: usize,

    /// Traffic density (probability each vehicle slot is occupied)
    #[arg(long, default_value_t = 0.3)]
    pub traffic: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a JSON summary of the run
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Write per-trial metrics as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    pub quiet: bool,
}

pub fn execute(args: BaselineArgs) -> Result<()> {
    let agent_config = match args.seed {
        Some(seed) => AgentConfig::new(false).with_seed(seed),
        None => AgentConfig::new(false),
    };

    let world = TrafficWorld::new(WorldConfig {
        traffic: args.traffic,
        deadline_factor: 5,
        seed: args.seed,
    })?
    .shared();

    let mut agent = DrivingAgent::new(agent_config, Box::new(world.planner()), &world)
        .context("creating agent")?;

    let mut simulation = Simulation::new(SimulationConfig {
        training_trials: args.trials,
        testing_trials: 0,
        route_legs: args.route_legs,
        seed: args.seed,
    });
    if !args.quiet {
        simulation = simulation.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.csv {
        simulation =
            simulation.with_observer(Box::new(CsvObserver::new(path).context("opening CSV log")?));
    }

    let result = simulation.run(&mut agent, &world)?;

    output::print_section("Random baseline driver");
    output::print_trial_stats("Trials", &result.training);

    if let Some(raw) = &args.summary {
        let path = write_summary(&result, raw, "baseline_summary.json")?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
