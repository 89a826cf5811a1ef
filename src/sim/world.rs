//! Intersection world adapter
//!
//! A compact stand-in for the grid-world simulation engine: it samples
//! traffic percepts, scores actions against US right-of-way rules, consumes
//! route legs, and enforces the trial deadline. Grid topology and dummy-agent
//! pathing are out of scope; the world models exactly the percept and reward
//! surface the agent consumes.

use std::sync::{Arc, Mutex};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ports::Environment,
    types::{Action, Direction, Percept, Route, TrafficLight},
};

/// Reward for executing the waypoint maneuver legally.
pub const REWARD_ON_ROUTE: f64 = 2.0;
/// Reward for holding while the waypoint maneuver is currently illegal.
pub const REWARD_YIELD: f64 = 1.0;
/// Reward for a legal action that wastes the step.
pub const REWARD_WASTED: f64 = -0.5;
/// Penalty for violating right-of-way.
pub const PENALTY_VIOLATION: f64 = -5.0;

/// Whether an action respects right-of-way under the given percept.
///
/// Rules: only `oncoming` matters when turning left; `right` is already
/// covered by the light; `left` matters for turning right on red.
pub fn action_is_legal(percept: &Percept, action: Action) -> bool {
    match action {
        Action::Hold => true,
        Action::Forward => percept.light == TrafficLight::Green,
        Action::Left => {
            percept.light == TrafficLight::Green
                && !matches!(
                    percept.oncoming,
                    Some(Direction::Forward) | Some(Direction::Right)
                )
        }
        Action::Right => {
            percept.light == TrafficLight::Green || percept.left != Some(Direction::Forward)
        }
    }
}

/// Configuration for the intersection world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Probability that each vehicle slot is occupied per step
    pub traffic: f64,
    /// Deadline steps granted per route leg
    pub deadline_factor: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            traffic: 0.3,
            deadline_factor: 5,
            seed: None,
        }
    }
}

/// Per-trial telemetry collected while the cab drives.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TrialTelemetry {
    /// Decision cycles taken
    pub steps: usize,
    /// Sum of rewards observed
    pub total_reward: f64,
    /// Right-of-way violations committed
    pub violations: usize,
    /// Route legs completed
    pub legs_completed: usize,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

fn sample_vehicle(rng: &mut StdRng, density: f64) -> Option<Direction> {
    if rng.random_bool(density) {
        Direction::ALL.choose(rng).copied()
    } else {
        None
    }
}

/// The intersection world the cab drives through.
///
/// Wrap in [`SharedWorld`] to hand the environment and planner ports to the
/// agent as two views of the same object.
#[derive(Debug)]
pub struct TrafficWorld {
    rng: StdRng,
    traffic: f64,
    deadline_factor: usize,
    route: Route,
    percept: Percept,
    deadline: i64,
    telemetry: TrialTelemetry,
}

impl TrafficWorld {
    /// Create a new world.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when `traffic` is not a
    /// probability.
    pub fn new(config: WorldConfig) -> Result<Self> {
        if !config.traffic.is_finite() || !(0.0..=1.0).contains(&config.traffic) {
            return Err(Error::InvalidConfiguration {
                message: format!("traffic density must be in [0, 1], got {}", config.traffic),
            });
        }
        let mut rng = build_rng(config.seed);
        let traffic = config.traffic;
        let percept = Self::sample_percept_with(&mut rng, traffic);
        Ok(Self {
            rng,
            traffic,
            deadline_factor: config.deadline_factor.max(1),
            route: Route::default(),
            percept,
            deadline: 0,
            telemetry: TrialTelemetry::default(),
        })
    }

    /// Wrap the world in a shared single-threaded handle.
    pub fn shared(self) -> SharedWorld {
        SharedWorld {
            inner: Arc::new(Mutex::new(self)),
        }
    }

    /// Sample a fresh destination of `legs` maneuvers.
    pub fn destination(&mut self, legs: usize) -> Route {
        Route::random(&mut self.rng, legs)
    }

    /// Install the route for a new trial, resetting deadline and telemetry.
    pub fn install_route(&mut self, destination: Option<Route>) {
        self.route = destination.unwrap_or_default();
        self.deadline = (self.route.remaining() * self.deadline_factor) as i64;
        self.telemetry = TrialTelemetry::default();
        self.percept = Self::sample_percept_with(&mut self.rng, self.traffic);
    }

    /// Current intersection percept.
    pub fn percept(&self) -> Percept {
        self.percept
    }

    /// Next waypoint hint toward the destination.
    pub fn next_waypoint(&self) -> Option<Direction> {
        self.route.next_leg()
    }

    /// Whether the destination has been reached.
    pub fn arrived(&self) -> bool {
        self.route.is_complete()
    }

    /// Remaining deadline steps.
    pub fn remaining_deadline(&self) -> i64 {
        self.deadline
    }

    /// Telemetry for the trial in progress.
    pub fn telemetry(&self) -> TrialTelemetry {
        self.telemetry
    }

    /// Execute an action: score it, consume a route leg on progress, burn a
    /// deadline step, and roll fresh traffic for the next cycle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RouteComplete`] when called after arrival.
    pub fn step(&mut self, action: Action) -> Result<f64> {
        if self.route.is_complete() {
            return Err(Error::RouteComplete);
        }

        let (reward, advanced, violation) = self.score(action);
        if advanced {
            self.route.advance();
            self.telemetry.legs_completed += 1;
        }
        if violation {
            self.telemetry.violations += 1;
        }
        self.telemetry.steps += 1;
        self.telemetry.total_reward += reward;
        self.deadline -= 1;
        self.percept = Self::sample_percept_with(&mut self.rng, self.traffic);
        Ok(reward)
    }

    fn score(&self, action: Action) -> (f64, bool, bool) {
        if !action_is_legal(&self.percept, action) {
            return (PENALTY_VIOLATION, false, true);
        }

        let desired = self.route.next_leg().map(Action::from);
        if desired == Some(action) {
            return (REWARD_ON_ROUTE, true, false);
        }

        let blocked = desired.is_some_and(|d| !action_is_legal(&self.percept, d));
        if action == Action::Hold && blocked {
            (REWARD_YIELD, false, false)
        } else {
            (REWARD_WASTED, false, false)
        }
    }

    fn sample_percept_with(rng: &mut StdRng, traffic: f64) -> Percept {
        let light = if rng.random_bool(0.5) {
            TrafficLight::Green
        } else {
            TrafficLight::Red
        };
        Percept {
            light,
            left: sample_vehicle(rng, traffic),
            right: sample_vehicle(rng, traffic),
            oncoming: sample_vehicle(rng, traffic),
        }
    }
}

impl Environment for TrafficWorld {
    fn sense(&mut self) -> Result<Percept> {
        Ok(self.percept)
    }

    fn deadline(&mut self) -> Result<i64> {
        Ok(self.deadline)
    }

    fn act(&mut self, action: Action) -> Result<f64> {
        self.step(action)
    }
}

/// Shared single-threaded handle to a [`TrafficWorld`].
///
/// Exists so the environment and planner ports can be two views of one world
/// object; locks are held only within a single port call, never across a
/// decision cycle.
#[derive(Debug, Clone)]
pub struct SharedWorld {
    inner: Arc<Mutex<TrafficWorld>>,
}

impl SharedWorld {
    /// Create a planner view onto this world.
    pub fn planner(&self) -> super::planner::WorldPlanner {
        super::planner::WorldPlanner::new(self.clone())
    }

    /// Sample a fresh destination of `legs` maneuvers.
    pub fn destination(&self, legs: usize) -> Result<Route> {
        self.with("destination", |world| world.destination(legs))
    }

    /// Install the route for a new trial.
    pub fn install_route(&self, destination: Option<Route>) -> Result<()> {
        self.with("route_to", |world| world.install_route(destination))
    }

    /// Next waypoint hint toward the destination.
    pub fn next_waypoint(&self) -> Result<Option<Direction>> {
        self.with("next_waypoint", |world| world.next_waypoint())
    }

    /// Whether the destination has been reached.
    pub fn arrived(&self) -> Result<bool> {
        self.with("arrived", |world| world.arrived())
    }

    /// Remaining deadline steps.
    pub fn remaining_deadline(&self) -> Result<i64> {
        self.with("deadline", |world| world.remaining_deadline())
    }

    /// Telemetry for the trial in progress.
    pub fn telemetry(&self) -> Result<TrialTelemetry> {
        self.with("telemetry", |world| world.telemetry())
    }

    fn with<T>(&self, operation: &'static str, f: impl FnOnce(&mut TrafficWorld) -> T) -> Result<T> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| Error::WorldPoisoned { operation })?;
        Ok(f(&mut guard))
    }
}

impl Environment for SharedWorld {
    fn sense(&mut self) -> Result<Percept> {
        self.with("sense", |world| world.percept())
    }

    fn deadline(&mut self) -> Result<i64> {
        self.with("deadline", |world| world.remaining_deadline())
    }

    fn act(&mut self, action: Action) -> Result<f64> {
        self.with("act", |world| world.step(action))?
    }
}
