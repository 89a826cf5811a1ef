//! Simulation adapters: the intersection world and its planner view.

pub mod planner;
pub mod world;

pub use planner::WorldPlanner;
pub use world::{
    PENALTY_VIOLATION, REWARD_ON_ROUTE, REWARD_WASTED, REWARD_YIELD, SharedWorld, TrafficWorld,
    TrialTelemetry, WorldConfig, action_is_legal,
};
