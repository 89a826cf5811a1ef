//! The learning driving agent
//!
//! This module implements the decision cycle that ties the components
//! together: abstract the percept, create the Q-table entry, select an
//! action under the ε-greedy policy, act, and fold the observed reward back
//! into the table.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    agent::{q_table::QTable, schedule::DecaySchedule},
    app::AgentConfig,
    error::{Error, Result},
    ports::{Environment, RoutePlanner},
    types::{Action, Direction, Route, State},
};

/// One completed decision cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Abstracted state the decision was made in
    pub state: State,
    /// Action taken
    pub action: Action,
    /// Reward observed for the action
    pub reward: f64,
    /// Deadline remaining when the cycle started
    pub deadline: i64,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning driving agent
///
/// Owns the Q-table, the exploration/learning rates, and the trial counter.
/// In learning mode it follows an ε-greedy policy with uniform tie-breaking;
/// in fixed mode it drives uniformly at random as a naive baseline. One
/// agent instance drives one cab; nothing is shared process-wide.
pub struct DrivingAgent {
    planner: Box<dyn RoutePlanner>,
    actions: Vec<Action>,
    learning: bool,
    q_table: QTable,
    epsilon: f64,
    alpha: f64,
    decay: DecaySchedule,
    trial: usize,
    state: Option<State>,
    next_waypoint: Option<Direction>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl DrivingAgent {
    /// Create a new driving agent
    ///
    /// Captures the environment's constant action set and validates the
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for out-of-range rates and
    /// [`Error::NoActionsAvailable`] if the environment exposes an empty
    /// action set.
    pub fn new(
        config: AgentConfig,
        planner: Box<dyn RoutePlanner>,
        env: &dyn Environment,
    ) -> Result<Self> {
        config.validate()?;
        let actions = env.valid_actions().to_vec();
        if actions.is_empty() {
            return Err(Error::NoActionsAvailable);
        }
        Ok(Self {
            planner,
            actions,
            learning: config.learning,
            q_table: QTable::new(),
            epsilon: config.epsilon,
            alpha: config.alpha,
            decay: config.decay,
            trial: 0,
            state: None,
            next_waypoint: None,
            rng: build_rng(config.seed),
            rng_seed: config.seed,
        })
    }

    /// Seed the agent's random source for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(Some(seed));
        self
    }

    /// Replace the agent's random source.
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = build_rng(seed);
        self.rng_seed = seed;
    }

    /// Seed the agent's random source was built from, if any.
    pub fn seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Current exploration rate ε.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Current learning rate α.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Trials started so far.
    pub fn trial(&self) -> usize {
        self.trial
    }

    /// Whether the agent is learning or driving the fixed baseline policy.
    pub fn is_learning(&self) -> bool {
        self.learning
    }

    /// The learned value table.
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// State recorded by the most recent action selection.
    pub fn current_state(&self) -> Option<State> {
        self.state
    }

    /// Waypoint hint recorded by the most recent action selection.
    pub fn next_waypoint(&self) -> Option<Direction> {
        self.next_waypoint
    }

    /// Per-trial reset, called once before each trial.
    ///
    /// Routes the planner to the new destination and advances the trial
    /// counter. A testing trial forces ε and α to exactly zero — pure
    /// exploitation, no further learning, not reversible within the trial.
    /// A training trial decays both rates by the configured schedule,
    /// unconditionally on outcome.
    pub fn reset(&mut self, destination: Option<Route>, testing: bool) -> Result<()> {
        self.planner.route_to(destination)?;
        self.trial += 1;
        self.state = None;
        self.next_waypoint = None;

        if testing {
            self.epsilon = 0.0;
            self.alpha = 0.0;
        } else {
            self.epsilon = self.decay.apply(self.epsilon);
            self.alpha = self.decay.apply(self.alpha);
        }
        Ok(())
    }

    /// Abstract the current percept and waypoint hint into a state key.
    pub fn build_state(&mut self, env: &mut dyn Environment) -> Result<State> {
        let percept = env.sense()?;
        let waypoint = self.planner.next_waypoint()?;
        Ok(State::from_percept(waypoint, &percept))
    }

    /// Create the state's Q-table entry when learning.
    ///
    /// Gated on learning mode: the table must never grow while the agent
    /// drives the fixed baseline policy.
    pub fn ensure_state(&mut self, state: &State) {
        if self.learning {
            self.q_table.ensure(*state, &self.actions);
        }
    }

    /// Choose an action for the state.
    ///
    /// Fixed mode picks uniformly at random, independent of state. Learning
    /// mode explores with probability ε and otherwise exploits, breaking
    /// Q-value ties uniformly — including the degenerate single-winner case.
    ///
    /// Also records the state as current and refreshes the waypoint hint
    /// from the planner (bookkeeping for reporting, not decision logic).
    pub fn choose_action(&mut self, state: &State) -> Result<Action> {
        self.state = Some(*state);
        self.next_waypoint = self.planner.next_waypoint()?;

        if !self.learning {
            return self.random_action();
        }

        if self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            self.random_action()
        } else {
            // Exploit: uniform choice among the maximal actions
            let best = self.q_table.best_actions(state)?;
            best.choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoActionsAvailable)
        }
    }

    /// Fold an observed reward into the Q-table.
    ///
    /// One-step rule, no discount: `Q[s][a] ← (1 − α)·Q[s][a] + α·reward`.
    /// No-op when learning is disabled.
    pub fn learn(&mut self, state: &State, action: Action, reward: f64) -> Result<()> {
        if !self.learning {
            return Ok(());
        }
        self.q_table.blend(state, action, self.alpha, reward)
    }

    /// Maximum Q-value recorded for the state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnvisitedState`] for a state never `ensure`d.
    pub fn max_q(&self, state: &State) -> Result<f64> {
        self.q_table.max_value(state)
    }

    /// Run one decision cycle against the environment.
    ///
    /// Sense → abstract → ensure → select → act → learn. The cycle is atomic
    /// from the caller's perspective; the Q-table update is the last action
    /// and is all-or-nothing.
    pub fn update(&mut self, env: &mut dyn Environment) -> Result<Step> {
        let deadline = env.deadline()?;
        let state = self.build_state(env)?;
        self.ensure_state(&state);
        let action = self.choose_action(&state)?;
        let reward = env.act(action)?;
        self.learn(&state, action, reward)?;
        Ok(Step {
            state,
            action,
            reward,
            deadline,
        })
    }

    fn random_action(&mut self) -> Result<Action> {
        self.actions
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoActionsAvailable)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::types::{Percept, TrafficLight};

    /// Planner stub returning a scripted waypoint.
    struct ScriptedPlanner {
        waypoint: Option<Direction>,
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
    struct StaticEnv {
        percept: Percept,
        reward: f64,
    }

    impl Environment for StaticEnv {
        fn sense(&mut self) -> Result<Percept> {
            Ok(self.percept)
        }

        fn deadline(&mut self) -> Result<i64> {
            Ok(20)
        }

        fn act(&mut self, _action: Action) -> Result<f64> {
            Ok(self.reward)
        }
    }

    fn static_env(reward: f64) -> StaticEnv {
        StaticEnv {
            percept: Percept {
                light: TrafficLight::Green,
                left: None,
                right: None,
                oncoming: None,
            },
            reward,
        }
    }

    fn agent(config: AgentConfig) -> DrivingAgent {
        let planner = ScriptedPlanner {
            waypoint: Some(Direction::Forward),
        };
        DrivingAgent::new(config, Box::new(planner), &static_env(0.0)).unwrap()
    }

    fn forward_state() -> State {
        State {
            waypoint: Some(Direction::Forward),
            light: TrafficLight::Green,
            left: None,
            oncoming: None,
        }
    }

    #[test]
    fn test_fixed_mode_never_touches_table() {
        let config = AgentConfig::new(false).with_seed(7);
        let mut agent = agent(config);
        let mut env = static_env(1.0);

        for _ in 0..50 {
            agent.update(&mut env).unwrap();
        }
        assert!(agent.q_table().is_empty());
    }

    #[test]
    fn test_fixed_mode_draws_roughly_uniformly() {
        let config = AgentConfig::new(false).with_seed(3);
        let mut agent = agent(config);
        let state = forward_state();

        let mut counts: HashMap<Action, usize> = HashMap::new();
        for _ in 0..1000 {
            let action = agent.choose_action(&state).unwrap();
            *counts.entry(action).or_insert(0) += 1;
        }

        for action in Action::ALL {
            let count = counts.get(&action).copied().unwrap_or(0);
            assert!(
                (150..=350).contains(&count),
                "{action} drawn {count} times out of 1000"
            );
        }
    }

    #[test]
    fn test_exploitation_breaks_ties_uniformly() {
        let config = AgentConfig::new(true)
            .with_epsilon(0.0)
            .with_alpha(1.0)
            .with_seed(11);
        let mut agent = agent(config);
        let state = forward_state();

        agent.ensure_state(&state);
        agent.learn(&state, Action::Forward, 2.0).unwrap();
        agent.learn(&state, Action::Left, 2.0).unwrap();

        let mut counts: HashMap<Action, usize> = HashMap::new();
        for _ in 0..500 {
            let action = agent.choose_action(&state).unwrap();
            *counts.entry(action).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 2, "only the tied maximal actions: {counts:?}");
        assert!(counts[&Action::Forward] > 100);
        assert!(counts[&Action::Left] > 100);
    }

    #[test]
    fn test_exploitation_single_winner_is_deterministic() {
        let config = AgentConfig::new(true)
            .with_epsilon(0.0)
            .with_alpha(1.0)
            .with_seed(11);
        let mut agent = agent(config);
        let state = forward_state();

        agent.ensure_state(&state);
        agent.learn(&state, Action::Right, 2.0).unwrap();

        for _ in 0..20 {
            assert_eq!(agent.choose_action(&state).unwrap(), Action::Right);
        }
    }

    #[test]
    fn test_update_rule_blends_reward() {
        let config = AgentConfig::new(true).with_epsilon(0.0).with_alpha(0.5);
        let mut agent = agent(config);
        let state = forward_state();

        agent.ensure_state(&state);
        agent.learn(&state, Action::Forward, 2.0).unwrap();
        let q = agent.q_table().get(&state, Action::Forward).unwrap();
        assert!((q - 1.0).abs() < 1e-12);

        agent.learn(&state, Action::Forward, 2.0).unwrap();
        let q = agent.q_table().get(&state, Action::Forward).unwrap();
        assert!((q - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_full_learning_rate_scenario() {
        // Fresh table, α = 1.0: one reward of 2.0 discards the prior entirely.
        let config = AgentConfig::new(true).with_epsilon(0.0).with_alpha(1.0);
        let mut agent = agent(config);
        let state = State {
            waypoint: Some(Direction::Forward),
            light: TrafficLight::Green,
            left: Some(Direction::Forward),
            oncoming: None,
        };

        agent.ensure_state(&state);
        for action in Action::ALL {
            assert_eq!(agent.q_table().get(&state, action), Some(0.0));
        }

        agent.learn(&state, Action::Forward, 2.0).unwrap();
        assert_eq!(agent.q_table().get(&state, Action::Forward), Some(2.0));
        assert_eq!(agent.max_q(&state).unwrap(), 2.0);
    }

    #[test]
    fn test_training_reset_decays_monotonically() {
        let config = AgentConfig::new(true).with_epsilon(1.0).with_alpha(0.5);
        let mut agent = agent(config);

        let mut last_epsilon = agent.epsilon();
        let mut last_alpha = agent.alpha();
        for _ in 0..120 {
            agent.reset(None, false).unwrap();
            assert!(agent.epsilon() <= last_epsilon);
            assert!(agent.alpha() <= last_alpha);
            assert!(agent.epsilon() >= 0.0);
            assert!(agent.alpha() >= 0.0);
            last_epsilon = agent.epsilon();
            last_alpha = agent.alpha();
        }
        // Linear 0.01 reaches zero within the 100-trial horizon.
        assert_eq!(agent.epsilon(), 0.0);
        assert_eq!(agent.alpha(), 0.0);
        assert_eq!(agent.trial(), 120);
    }

    #[test]
    fn test_testing_reset_zeroes_rates() {
        let config = AgentConfig::new(true).with_epsilon(0.8).with_alpha(0.6);
        let mut agent = agent(config);

        agent.reset(None, true).unwrap();
        assert_eq!(agent.epsilon(), 0.0);
        assert_eq!(agent.alpha(), 0.0);
    }

    #[test]
    fn test_learn_requires_ensured_pair() {
        let config = AgentConfig::new(true).with_epsilon(0.0).with_alpha(0.5);
        let mut agent = agent(config);
        let state = forward_state();

        assert!(matches!(
            agent.learn(&state, Action::Forward, 1.0),
            Err(Error::UnvisitedState { .. })
        ));
    }

    #[test]
    fn test_choose_action_records_bookkeeping() {
        let config = AgentConfig::new(true).with_epsilon(0.0).with_seed(5);
        let mut agent = agent(config);
        let state = forward_state();

        agent.ensure_state(&state);
        agent.choose_action(&state).unwrap();
        assert_eq!(agent.current_state(), Some(state));
        assert_eq!(agent.next_waypoint(), Some(Direction::Forward));
    }
}
