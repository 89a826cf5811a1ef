//! Observer adapters for the trial harness
//!
//! Observers allow composable data collection during a run without coupling
//! the harness to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    agent::Step,
    pipeline::trials::{TrialRecord, TrialStats},
    ports::Observer,
};

/// Observation of a single decision cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    /// Trial number
    pub trial: usize,
    /// Step number within the trial
    pub step_num: usize,
    /// Abstracted state key
    pub state: String,
    /// Action taken
    pub action: String,
    /// Reward observed
    pub reward: f64,
    /// Deadline remaining when the cycle started
    pub deadline: i64,
}

/// Complete observation of one trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialObservation {
    /// Trial number
    pub trial: usize,
    /// Whether this was a testing trial
    pub testing: bool,
    /// Whether the cab reached the destination
    pub reached: bool,
    /// Sum of rewards observed
    pub total_reward: f64,
    /// Steps in the trial
    pub steps: Vec<StepObservation>,
}

/// Progress bar observer - shows run progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
    failures: usize,
    violations: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
            failures: 0,
            violations: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_trials: usize) -> Result<()> {
        let pb = ProgressBar::new(total_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, record: &TrialRecord) -> Result<()> {
        if record.reached {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.violations += record.violations;

        if let Some(pb) = &self.progress_bar {
            pb.set_position((record.trial + 1) as u64);
            pb.set_message(format!(
                "S:{} F:{} V:{}",
                self.successes, self.failures, self.violations
            ));
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "S:{} F:{} V:{}",
                self.successes, self.failures, self.violations
            ));
        }
        Ok(())
    }
}

/// Metrics observer - accumulates trial records for later aggregation
pub struct MetricsObserver {
    training: Vec<TrialRecord>,
    testing: Vec<TrialRecord>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            training: Vec::new(),
            testing: Vec::new(),
        }
    }

    /// Aggregate statistics over the training trials seen so far
    pub fn training_stats(&self) -> TrialStats {
        TrialStats::from_records(&self.training)
    }

    /// Aggregate statistics over the testing trials seen so far
    pub fn testing_stats(&self) -> TrialStats {
        TrialStats::from_records(&self.testing)
    }

    /// All records seen so far, training then testing
    pub fn records(&self) -> impl Iterator<Item = &TrialRecord> {
        self.training.iter().chain(self.testing.iter())
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_trial_end(&mut self, record: &TrialRecord) -> Result<()> {
        if record.testing {
            self.testing.push(record.clone());
        } else {
            self.training.push(record.clone());
        }
        Ok(())
    }
}

/// JSONL observer - exports one trial observation per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepObservation>,
    current_testing: bool,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_steps: Vec::new(),
            current_testing: false,
        })
    }
}

impl Observer for JsonlObserver {
    fn on_trial_start(&mut self, _trial: usize, testing: bool) -> Result<()> {
        self.current_steps.clear();
        self.current_testing = testing;
        Ok(())
    }

    fn on_step(&mut self, trial: usize, step_num: usize, step: &Step) -> Result<()> {
        self.current_steps.push(StepObservation {
            trial,
            step_num,
            state: step.state.to_string(),
            action: step.action.to_string(),
            reward: step.reward,
            deadline: step.deadline,
        });
        Ok(())
    }

    fn on_trial_end(&mut self, record: &TrialRecord) -> Result<()> {
        let observation = TrialObservation {
            trial: record.trial,
            testing: self.current_testing,
            reached: record.reached,
            total_reward: record.total_reward,
            steps: std::mem::take(&mut self.current_steps),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// CSV observer - one metric row per trial
pub struct CsvObserver {
    writer: csv::Writer<File>,
}

impl CsvObserver {
    /// Create a new CSV observer writing to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl Observer for CsvObserver {
    fn on_trial_end(&mut self, record: &TrialRecord) -> Result<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
