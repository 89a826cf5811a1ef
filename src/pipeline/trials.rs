//! Trial harness for driving agents

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    agent::DrivingAgent,
    ports::Observer,
    sim::SharedWorld,
};

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of training trials (learning and exploration active)
    pub training_trials: usize,

    /// Number of testing trials appended after training (ε = α = 0)
    pub testing_trials: usize,

    /// Route legs per destination
    pub route_legs: usize,

    /// Random seed for the agent's draws
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            training_trials: 100,
            testing_trials: 10,
            route_legs: 5,
            seed: None,
        }
    }
}

/// Telemetry record for one completed trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Trial index (0-based, across training and testing)
    pub trial: usize,
    /// Whether this was a testing trial
    pub testing: bool,
    /// Whether the cab reached the destination
    pub reached: bool,
    /// Decision cycles taken
    pub steps: usize,
    /// Sum of rewards observed
    pub total_reward: f64,
    /// Right-of-way violations committed
    pub violations: usize,
    /// Exploration rate in effect during the trial
    pub epsilon: f64,
    /// Learning rate in effect during the trial
    pub alpha: f64,
}

/// Aggregate statistics over a set of trials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialStats {
    pub trials: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub avg_reward: f64,
    pub avg_steps: f64,
    pub violation_rate: f64,
}

impl TrialStats {
    /// Aggregate a set of trial records
    pub fn from_records(records: &[TrialRecord]) -> Self {
        let trials = records.len();
        if trials == 0 {
            return Self::default();
        }

        let successes = records.iter().filter(|r| r.reached).count();
        let total_steps: usize = records.iter().map(|r| r.steps).sum();
        let total_violations: usize = records.iter().map(|r| r.violations).sum();
        let total_reward: f64 = records.iter().map(|r| r.total_reward).sum();

        Self {
            trials,
            successes,
            success_rate: successes as f64 / trials as f64,
            avg_reward: total_reward / trials as f64,
            avg_steps: total_steps as f64 / trials as f64,
            violation_rate: if total_steps > 0 {
                total_violations as f64 / total_steps as f64
            } else {
                0.0
            },
        }
    }
}

/// Result of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Statistics over the training trials
    pub training: TrialStats,

    /// Statistics over the testing trials
    pub testing: TrialStats,

    /// Distinct states created in the Q-table
    pub visited_states: usize,

    /// Exploration rate after the final trial
    pub final_epsilon: f64,

    /// Learning rate after the final trial
    pub final_alpha: f64,
}

impl SimulationResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Simulation harness driving an agent through training and testing trials
///
/// Each trial: sample a destination, reset the agent (decay or zero the
/// rates), then run decision cycles until arrival or deadline exhaustion.
/// Observers receive every step and trial record.
pub struct Simulation {
    config: SimulationConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Simulation {
    /// Create a new simulation harness
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the harness
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run the configured trials with the given agent and world
    pub fn run(&mut self, agent: &mut DrivingAgent, world: &SharedWorld) -> Result<SimulationResult> {
        if let Some(seed) = self.config.seed {
            agent.reseed(Some(seed));
        }

        let total_trials = self.config.training_trials + self.config.testing_trials;
        for observer in &mut self.observers {
            observer.on_run_start(total_trials)?;
        }

        let mut training_records = Vec::with_capacity(self.config.training_trials);
        let mut testing_records = Vec::with_capacity(self.config.testing_trials);

        for trial in 0..total_trials {
            let testing = trial >= self.config.training_trials;

            let destination = world.destination(self.config.route_legs)?;
            agent.reset(Some(destination), testing)?;

            for observer in &mut self.observers {
                observer.on_trial_start(trial, testing)?;
            }

            let mut env = world.clone();
            let mut step_num = 0;
            while !world.arrived()? && world.remaining_deadline()? > 0 {
                let step = agent.update(&mut env)?;
                for observer in &mut self.observers {
                    observer.on_step(trial, step_num, &step)?;
                }
                step_num += 1;
            }

            let telemetry = world.telemetry()?;
            let record = TrialRecord {
                trial,
                testing,
                reached: world.arrived()?,
                steps: telemetry.steps,
                total_reward: telemetry.total_reward,
                violations: telemetry.violations,
                epsilon: agent.epsilon(),
                alpha: agent.alpha(),
            };

            for observer in &mut self.observers {
                observer.on_trial_end(&record)?;
            }

            if testing {
                testing_records.push(record);
            } else {
                training_records.push(record);
            }
        }

        for observer in &mut self.observers {
            observer.on_run_end()?;
        }

        Ok(SimulationResult {
            training: TrialStats::from_records(&training_records),
            testing: TrialStats::from_records(&testing_records),
            visited_states: agent.q_table().len(),
            final_epsilon: agent.epsilon(),
            final_alpha: agent.alpha(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::AgentConfig,
        sim::{TrafficWorld, WorldConfig},
    };

    fn seeded_world(seed: u64) -> SharedWorld {
        TrafficWorld::new(WorldConfig {
            traffic: 0.3,
            deadline_factor: 5,
            seed: Some(seed),
        })
        .unwrap()
        .shared()
    }

    #[test]
    fn test_simulation_counts_trials() {
        let world = seeded_world(42);
        let config = AgentConfig::new(true).with_seed(42);
        let mut agent = DrivingAgent::new(config, Box::new(world.planner()), &world).unwrap();

        let mut simulation = Simulation::new(SimulationConfig {
            training_trials: 10,
            testing_trials: 2,
            route_legs: 3,
            seed: Some(42),
        });

        let result = simulation.run(&mut agent, &world).unwrap();
        assert_eq!(result.training.trials, 10);
        assert_eq!(result.testing.trials, 2);
        assert!(result.visited_states > 0);
        assert!((0.0..=1.0).contains(&result.training.success_rate));
        assert_eq!(result.final_epsilon, 0.0);
        assert_eq!(result.final_alpha, 0.0);
    }

    #[test]
    fn test_fixed_agent_leaves_table_empty() {
        let world = seeded_world(7);
        let config = AgentConfig::new(false).with_seed(7);
        let mut agent = DrivingAgent::new(config, Box::new(world.planner()), &world).unwrap();

        let mut simulation = Simulation::new(SimulationConfig {
            training_trials: 5,
            testing_trials: 0,
            route_legs: 3,
            seed: Some(7),
        });

        let result = simulation.run(&mut agent, &world).unwrap();
        assert_eq!(result.visited_states, 0);
        assert_eq!(result.training.trials, 5);
    }
}
