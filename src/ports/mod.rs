//! Ports - trait boundaries between the learning core and its collaborators
//!
//! The agent core never talks to a concrete world: it senses and acts through
//! the [`Environment`] port and follows waypoints through the [`RoutePlanner`]
//! port. Trial harnesses report progress through [`Observer`]. Concrete
//! implementations (the intersection world, the progress bar, the JSONL log)
//! are adapters living in `sim` and `pipeline`.

pub mod environment;
pub mod observer;
pub mod planner;

pub use environment::Environment;
pub use observer::Observer;
pub use planner::RoutePlanner;
