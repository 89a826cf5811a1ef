//! Q-learning agent core
//!
//! The learning core of the smartcab: state abstraction keys into a lazily
//! populated [`QTable`], an ε-greedy policy balances exploration against
//! exploitation, and a one-step no-discount rule folds each observed reward
//! back into the table. Exploration and learning rates decay per trial under
//! a configurable [`DecaySchedule`].
//!
//! ## Usage Example
//!
//! ```no_run
//! use smartcab::{AgentConfig, DrivingAgent, TrafficWorld, WorldConfig};
//!
//! # fn main() -> smartcab::Result<()> {
//! let world = TrafficWorld::new(WorldConfig::default())?.shared();
//! let config = AgentConfig::new(true).with_epsilon(1.0).with_alpha(0.5);
//! let mut agent = DrivingAgent::new(config, Box::new(world.planner()), &world)?;
//!
//! let destination = world.destination(5)?;
//! agent.reset(Some(destination), false)?;
//!
//! let mut env = world.clone();
//! while !world.arrived()? && world.remaining_deadline()? > 0 {
//!     let step = agent.update(&mut env)?;
//!     println!("{} -> {} ({:+.1})", step.state, step.action, step.reward);
//! }
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod q_table;
pub mod schedule;

pub use driver::{DrivingAgent, Step};
pub use q_table::QTable;
pub use schedule::DecaySchedule;
