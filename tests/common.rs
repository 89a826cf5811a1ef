//! Shared fixtures for integration tests
#![allow(dead_code)]

use smartcab::{
    AgentConfig, Direction, DrivingAgent, Percept, Result, Route, State, TrafficLight,
    ports::{Environment, RoutePlanner},
};

/// Planner stub returning a scripted waypoint.
pub struct ScriptedPlanner {
    pub waypoint: Option<Direction>,
}

impl RoutePlanner for ScriptedPlanner {
    fn route_to(&mut self, destination: Option<Route>) -> Result<()> {
        self.waypoint = destination.and_then(|route| route.next_leg());
        Ok(())
    }

    fn next_waypoint(&mut self) -> Result<Option<Direction>> {
        Ok(self.waypoint)
    }
}

/// Environment stub with a fixed percept and reward.
pub struct StaticEnv {
    pub percept: Percept,
    pub reward: f64,
    pub deadline: i64,
}

impl Environment for StaticEnv {
    fn sense(&mut self) -> Result<Percept> {
        Ok(self.percept)
    }

    fn deadline(&mut self) -> Result<i64> {
        Ok(self.deadline)
    }

    fn act(&mut self, _action: smartcab::Action) -> Result<f64> {
        Ok(self.reward)
    }
}

pub fn green_clear_env(reward: f64) -> StaticEnv {
    StaticEnv {
        percept: Percept {
            light: TrafficLight::Green,
            left: None,
            right: None,
            oncoming: None,
        },
        reward,
        deadline: 20,
    }
}

pub fn forward_green_state() -> State {
    State {
        waypoint: Some(Direction::Forward),
        light: TrafficLight::Green,
        left: None,
        oncoming: None,
    }
}

pub fn build_agent(config: AgentConfig) -> DrivingAgent {
    let planner = ScriptedPlanner {
        waypoint: Some(Direction::Forward),
    };
    DrivingAgent::new(config, Box::new(planner), &green_clear_env(0.0))
        .expect("valid test configuration")
}

pub fn learning_agent(epsilon: f64, alpha: f64, seed: u64) -> DrivingAgent {
    build_agent(
        AgentConfig::new(true)
            .with_epsilon(epsilon)
            .with_alpha(alpha)
            .with_seed(seed),
    )
}

pub fn fixed_agent(seed: u64) -> DrivingAgent {
    build_agent(AgentConfig::new(false).with_seed(seed))
}
