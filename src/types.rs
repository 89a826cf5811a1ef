//! Domain vocabulary: maneuvers, traffic lights, percepts, and abstracted states.

use std::{collections::VecDeque, fmt};

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A maneuver direction relative to the cab's current heading.
///
/// Used both as the route planner's waypoint hint and as the declared intent
/// of other vehicles at the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Left,
    Right,
}

impl Direction {
    /// All maneuver directions, in a fixed order.
    pub const ALL: [Direction; 3] = [Direction::Forward, Direction::Left, Direction::Right];

    /// Get short label
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parse a direction from its label.
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Direction::Forward),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(Error::ParseDirection {
                input: other.to_string(),
                expected: "forward, left, right".to_string(),
            }),
        }
    }

    /// Parse an optional direction percept field.
    ///
    /// `"none"` means the slot is empty (no vehicle, or no waypoint). An empty
    /// string is a malformed percept and fails loudly rather than defaulting.
    pub fn parse_optional(input: &str, field: &'static str) -> Result<Option<Self>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::MissingPercept { field });
        }
        if trimmed.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        Self::parse(trimmed).map(Some)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Traffic light phase at the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLight {
    Red,
    Green,
}

impl TrafficLight {
    /// Get short label
    pub fn label(&self) -> &'static str {
        match self {
            TrafficLight::Red => "red",
            TrafficLight::Green => "green",
        }
    }

    /// Parse a traffic light phase from its label.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::MissingPercept { field: "light" });
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "red" => Ok(TrafficLight::Red),
            "green" => Ok(TrafficLight::Green),
            other => Err(Error::ParseTrafficLight {
                input: other.to_string(),
                expected: "red, green".to_string(),
            }),
        }
    }
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A legal driving action the cab may take on a time step.
///
/// The action set is constant for the process lifetime; `Hold` means staying
/// at the intersection for the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Hold,
    Forward,
    Left,
    Right,
}

impl Action {
    /// The full legal action set, in a fixed order.
    pub const ALL: [Action; 4] = [Action::Hold, Action::Forward, Action::Left, Action::Right];

    /// Get short label
    pub fn label(&self) -> &'static str {
        match self {
            Action::Hold => "hold",
            Action::Forward => "forward",
            Action::Left => "left",
            Action::Right => "right",
        }
    }

    /// Parse an action from its label.
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "hold" | "none" => Ok(Action::Hold),
            "forward" => Ok(Action::Forward),
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            other => Err(Error::ParseAction {
                input: other.to_string(),
                expected: "hold, forward, left, right".to_string(),
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<Direction> for Action {
    /// The maneuver that follows a waypoint hint.
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Action::Forward,
            Direction::Left => Action::Left,
            Direction::Right => Action::Right,
        }
    }
}

/// Raw intersection percept returned by the environment's `sense`.
///
/// `left`, `right`, and `oncoming` carry the declared intent of a vehicle
/// approaching from that bearing, or `None` when the slot is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percept {
    pub light: TrafficLight,
    pub left: Option<Direction>,
    pub right: Option<Direction>,
    pub oncoming: Option<Direction>,
}

impl Percept {
    /// Build a percept from textual field labels.
    ///
    /// Intended for fixtures and replayed observations. Empty fields are
    /// malformed percepts and fail with [`Error::MissingPercept`]; an
    /// incomplete state must never reach the Q-table.
    pub fn from_labels(light: &str, left: &str, right: &str, oncoming: &str) -> Result<Self> {
        Ok(Percept {
            light: TrafficLight::parse(light)?,
            left: Direction::parse_optional(left, "left")?,
            right: Direction::parse_optional(right, "right")?,
            oncoming: Direction::parse_optional(oncoming, "oncoming")?,
        })
    }
}

/// Abstracted, discretized description of the cab's situation.
///
/// The sole key into the Q-table. Field order mirrors the percept tuple
/// (waypoint, light, left, oncoming); the `right` percept is deliberately
/// dropped because the light phase already governs that conflict. No further
/// feature engineering is permitted: the impoverished state is what forces a
/// non-trivial exploration/exploitation balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    pub waypoint: Option<Direction>,
    pub light: TrafficLight,
    pub left: Option<Direction>,
    pub oncoming: Option<Direction>,
}

impl State {
    /// Abstract a raw percept and waypoint hint into a state key.
    ///
    /// Pure function of its inputs: equal percepts always abstract to equal
    /// states.
    pub fn from_percept(waypoint: Option<Direction>, percept: &Percept) -> Self {
        State {
            waypoint,
            light: percept.light,
            left: percept.left,
            oncoming: percept.oncoming,
        }
    }
}

fn opt_label(direction: Option<Direction>) -> &'static str {
    direction.map_or("none", |d| d.label())
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            opt_label(self.waypoint),
            self.light.label(),
            opt_label(self.left),
            opt_label(self.oncoming)
        )
    }
}

/// An ordered sequence of maneuvers leading to a destination.
///
/// This is the planner-facing destination value: the route planner hands out
/// the front leg as the next waypoint hint and consumes it when the cab
/// executes the maneuver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    legs: VecDeque<Direction>,
}

impl Route {
    /// Create a route from an ordered list of maneuvers.
    pub fn new<I>(legs: I) -> Self
    where
        I: IntoIterator<Item = Direction>,
    {
        Route {
            legs: legs.into_iter().collect(),
        }
    }

    /// Sample a random route of `legs` maneuvers.
    pub fn random<R: Rng>(rng: &mut R, legs: usize) -> Self {
        Route {
            legs: (0..legs)
                .map(|_| *Direction::ALL.choose(rng).expect("non-empty direction set"))
                .collect(),
        }
    }

    /// The next maneuver toward the destination, if any.
    pub fn next_leg(&self) -> Option<Direction> {
        self.legs.front().copied()
    }

    /// Consume the front leg after the cab executes it.
    pub fn advance(&mut self) -> Option<Direction> {
        self.legs.pop_front()
    }

    /// Remaining legs to the destination.
    pub fn remaining(&self) -> usize {
        self.legs.len()
    }

    /// Whether the destination has been reached.
    pub fn is_complete(&self) -> bool {
        self.legs.is_empty()
    }
}
