//! Route planner adapter backed by the shared world

use crate::{
    Result,
    ports::RoutePlanner,
    sim::world::SharedWorld,
    types::{Direction, Route},
};

/// Planner view onto a [`SharedWorld`].
///
/// The world owns the route; this adapter hands out the front leg as the
/// next waypoint hint and re-targets the world at trial start.
#[derive(Debug, Clone)]
pub struct WorldPlanner {
    world: SharedWorld,
}

impl WorldPlanner {
    /// Create a planner view onto the world.
    pub fn new(world: SharedWorld) -> Self {
        Self { world }
    }
}

impl RoutePlanner for WorldPlanner {
    fn route_to(&mut self, destination: Option<Route>) -> Result<()> {
        self.world.install_route(destination)
    }

    fn next_waypoint(&mut self) -> Result<Option<Direction>> {
        self.world.next_waypoint()
    }
}
