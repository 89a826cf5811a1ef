//! Smartcab: a tabular Q-learning driving agent
//!
//! This crate provides:
//! - A Q-learning driving agent with ε-greedy action selection and uniform
//!   tie-breaking
//! - A lazily populated Q-table keyed by abstracted intersection states
//! - Per-trial decay schedules for the exploration and learning rates
//! - An intersection-world simulator with US right-of-way rules
//! - A trial harness with composable observers (progress, JSONL, CSV)

pub mod agent;
pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod sim;
pub mod types;

pub use agent::{DecaySchedule, DrivingAgent, QTable, Step};
pub use app::AgentConfig;
pub use error::{Error, Result};
pub use sim::{SharedWorld, TrafficWorld, WorldConfig, WorldPlanner};
pub use types::{Action, Direction, Percept, Route, State, TrafficLight};
