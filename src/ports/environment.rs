//! Environment port - the world the cab senses and acts in

use crate::{
    Result,
    types::{Action, Percept},
};

/// Environment trait - the driving world as the agent sees it
///
/// One decision cycle touches this port three times: `sense` before choosing,
/// `deadline` for bookkeeping, and `act` to execute the maneuver and observe
/// its reward. Deadline enforcement and reward computation belong to the
/// implementation, never to the agent.
pub trait Environment {
    /// The constant set of legal driving actions.
    ///
    /// Fixed for the process lifetime; the agent captures it once at
    /// construction.
    fn valid_actions(&self) -> &'static [Action] {
        &Action::ALL
    }

    /// Observe the current intersection percept.
    fn sense(&mut self) -> Result<Percept>;

    /// Remaining time steps before the trial is forfeit.
    fn deadline(&mut self) -> Result<i64>;

    /// Execute an action and return the observed reward.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RouteComplete`] when called after the
    /// destination has been reached.
    fn act(&mut self, action: Action) -> Result<f64>;
}
