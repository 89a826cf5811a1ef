//! Route planner port - waypoint hints toward the current destination

use crate::{
    Result,
    types::{Direction, Route},
};

/// RoutePlanner trait - shortest-direction-to-destination as a black box
///
/// The agent uses the planner for exactly two things: re-targeting at the
/// start of each trial and reading the next waypoint hint. How the hint is
/// computed is the adapter's business.
pub trait RoutePlanner {
    /// Set (or clear) the destination for the coming trial.
    fn route_to(&mut self, destination: Option<Route>) -> Result<()>;

    /// The next maneuver toward the destination, or `None` once arrived
    /// (or when no destination is set).
    fn next_waypoint(&mut self) -> Result<Option<Direction>>;
}
