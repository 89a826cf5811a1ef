//! Observer port - abstraction for trial observation and data collection
//!
//! This port defines the interface for observing simulation events, allowing
//! composable data collection without coupling the trial harness to specific
//! output formats or metrics.

use crate::{Result, agent::Step, pipeline::trials::TrialRecord};

/// Observer trait for monitoring simulation runs
///
/// Observers can be composed to collect different kinds of data during a run:
/// progress bars for user feedback, JSONL export for analysis, CSV metric
/// logs, aggregate statistics.
///
/// # Event Sequence
///
/// 1. `on_run_start(total_trials)` - once at the beginning
/// 2. For each trial:
///    - `on_trial_start(trial, testing)`
///    - `on_step(...)` - for each decision cycle in the trial
///    - `on_trial_end(record)`
/// 3. `on_run_end()` - once at the end
pub trait Observer: Send {
    /// Called when the simulation run starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_run_start(&mut self, _total_trials: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a trial starts, after the agent has been reset.
    ///
    /// `testing` is true for evaluation trials (exploration and learning
    /// forced off).
    fn on_trial_start(&mut self, _trial: usize, _testing: bool) -> Result<()> {
        Ok(())
    }

    /// Called after each completed decision cycle.
    fn on_step(&mut self, _trial: usize, _step_num: usize, _step: &Step) -> Result<()> {
        Ok(())
    }

    /// Called when a trial ends, with the trial's telemetry record.
    fn on_trial_end(&mut self, _record: &TrialRecord) -> Result<()> {
        Ok(())
    }

    /// Called when the simulation run completes.
    ///
    /// Use this to finalize outputs, flush files, or display summaries.
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}
