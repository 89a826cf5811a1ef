//! Configuration types for agent creation.

use crate::{
    agent::DecaySchedule,
    error::{Error, Result},
};

/// Configuration for creating a driving agent.
///
/// Builder-style API mirroring the construction interface of the simulation
/// harness: `{learning, epsilon, alpha}` plus the decay schedule and an
/// optional seed for reproducible runs.
///
/// # Examples
///
/// ```
/// use smartcab::{AgentConfig, DecaySchedule};
///
/// let config = AgentConfig::new(true)
///     .with_epsilon(1.0)
///     .with_alpha(0.5)
///     .with_decay(DecaySchedule::Linear { step: 0.01 })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Whether the agent learns or drives the fixed random baseline
    pub learning: bool,
    /// Initial exploration rate ε (≥ 0)
    pub epsilon: f64,
    /// Initial learning rate α (in [0, 1])
    pub alpha: f64,
    /// Per-trial decay applied to both rates during training
    pub decay: DecaySchedule,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a configuration with the harness defaults (ε = 1.0, α = 0.5).
    pub fn new(learning: bool) -> Self {
        Self {
            learning,
            epsilon: 1.0,
            alpha: 0.5,
            decay: DecaySchedule::default(),
            seed: None,
        }
    }

    /// Set the initial exploration rate.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the initial learning rate.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the per-trial decay schedule.
    pub fn with_decay(mut self, decay: DecaySchedule) -> Self {
        self.decay = decay;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate rate ranges and the decay schedule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when ε is negative or α lies
    /// outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon must be non-negative, got {}", self.epsilon),
            });
        }
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidConfiguration {
                message: format!("alpha must be in [0, 1], got {}", self.alpha),
            });
        }
        self.decay.validate()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(false)
    }
}
