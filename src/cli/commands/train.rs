//! Train command - run learning trials followed by testing trials

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    agent::{DecaySchedule, DrivingAgent},
    app::AgentConfig,
    cli::output,
    pipeline::{
        CsvObserver, JsonlObserver, ProgressObserver, Simulation, SimulationConfig,
        SimulationResult,
    },
    sim::{TrafficWorld, WorldConfig},
};

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning driving agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of training trials
    #[arg(long, short = 't', default_value_t = 100)]
    pub trials: usize,

    /// Number of testing trials after training (exploration and learning off)
    #[arg(long, default_value_t = 10)]
    pub test_trials: usize,

    /// Initial exploration rate
    #[arg(long, default_value_t = 1.0)]
    pub epsilon: f64,

    /// Initial learning rate
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Per-trial decay schedule (linear:STEP or geometric:FACTOR[,FLOOR])
    #[arg(long, default_value = "linear:0.01")]
    pub decay: String,

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

    /// Write per-trial observations as JSON Lines
    #[arg(long)]
    pub jsonl: Option<PathBuf>,

    /// Write per-trial metrics as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    pub quiet: bool,
}

pub(crate) fn sanitize_summary_path(raw: &Path, default_name: &str) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push(default_name);
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

pub(crate) fn write_summary(
    result: &SimulationResult,
    raw_path: &Path,
    default_name: &str,
) -> Result<PathBuf> {
    let path = sanitize_summary_path(raw_path, default_name);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating summary directory {}", parent.display()))?;
    }
    result
        .save(&path)
        .with_context(|| format!("writing summary to {}", path.display()))?;
    Ok(path)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let decay: DecaySchedule = args.decay.parse().context("parsing --decay")?;

    let agent_config = AgentConfig::new(true)
        .with_epsilon(args.epsilon)
        .with_alpha(args.alpha)
        .with_decay(decay);
    let agent_config = match args.seed {
        Some(seed) => agent_config.with_seed(seed),
        None => agent_config,
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
        testing_trials: args.test_trials,
        route_legs: args.route_legs,
        seed: args.seed,
    });
    if !args.quiet {
        simulation = simulation.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.jsonl {
        simulation = simulation.with_observer(Box::new(
            JsonlObserver::new(path).context("opening JSONL log")?,
        ));
    }
    if let Some(path) = &args.csv {
        simulation =
            simulation.with_observer(Box::new(CsvObserver::new(path).context("opening CSV log")?));
    }

    let result = simulation.run(&mut agent, &world)?;

    output::print_section("Q-learning smartcab");
    output::print_kv("visited states", &result.visited_states.to_string());
    output::print_kv("final epsilon", &format!("{:.3}", result.final_epsilon));
    output::print_kv("final alpha", &format!("{:.3}", result.final_alpha));
    output::print_trial_stats("Training", &result.training);
    output::print_trial_stats("Testing", &result.testing);

    if let Some(raw) = &args.summary {
        let path = write_summary(&result, raw, "training_summary.json")?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
