//! Trial harness abstractions
//!
//! This module provides the simulation loop that drives an agent through
//! training and testing trials, plus composable observers for progress
//! display and data collection.

pub mod observers;
pub mod trials;

// Re-export observer implementations (adapters)
pub use observers::{
    CsvObserver, JsonlObserver, MetricsObserver, ProgressObserver, StepObservation,
    TrialObservation,
};
pub use trials::{Simulation, SimulationConfig, SimulationResult, TrialRecord, TrialStats};

pub use crate::ports::Observer;
