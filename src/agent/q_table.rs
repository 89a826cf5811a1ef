//! Q-table implementation for one-step reward learning

use std::collections::HashMap;

use crate::{
    error::{Error, Result},
    types::{Action, State},
};

/// Q-table mapping states to per-action value estimates
///
/// Lazily populated: a state is either absent or carries an entry for every
/// legal action (inserted together as 0.0 on first encounter). The table
/// grows monotonically and is never pruned.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<State, HashMap<Action, f64>>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the state's entry if absent, mapping every action to 0.0.
    ///
    /// Idempotent: an existing entry is returned untouched.
    pub fn ensure(&mut self, state: State, actions: &[Action]) -> &HashMap<Action, f64> {
        self.values
            .entry(state)
            .or_insert_with(|| actions.iter().map(|&action| (action, 0.0)).collect())
    }

    /// Whether the state has an entry.
    pub fn contains(&self, state: &State) -> bool {
        self.values.contains_key(state)
    }

    /// Q-value for a state-action pair, if recorded.
    pub fn get(&self, state: &State, action: Action) -> Option<f64> {
        self.values.get(state)?.get(&action).copied()
    }

    /// Maximum Q-value over the state's actions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnvisitedState`] if the state was never `ensure`d —
    /// a caller contract violation, fatal to the decision cycle.
    pub fn max_value(&self, state: &State) -> Result<f64> {
        let row = self.row(state)?;
        row.values()
            .copied()
            .fold(None, |best: Option<f64>, value| {
                Some(best.map_or(value, |b| b.max(value)))
            })
            .ok_or(Error::NoActionsAvailable)
    }

    /// All actions attaining [`QTable::max_value`] for the state.
    ///
    /// Returned in the fixed action order so that seeded tie-breaking is
    /// reproducible.
    pub fn best_actions(&self, state: &State) -> Result<Vec<Action>> {
        let max = self.max_value(state)?;
        let row = self.row(state)?;
        let mut best: Vec<Action> = row
            .iter()
            .filter(|&(_, &value)| value == max)
            .map(|(&action, _)| action)
            .collect();
        best.sort();
        Ok(best)
    }

    /// One-step value update: `Q[s][a] ← (1 − α)·Q[s][a] + α·reward`.
    ///
    /// No discounting: the estimate is a running weighted average of the
    /// immediate rewards observed for the pair.
    pub fn blend(&mut self, state: &State, action: Action, alpha: f64, reward: f64) -> Result<()> {
        let row = self
            .values
            .get_mut(state)
            .ok_or_else(|| Error::UnvisitedState {
                state: state.to_string(),
            })?;
        let value = row.get_mut(&action).ok_or_else(|| Error::MissingQValue {
            state: state.to_string(),
            action: action.to_string(),
        })?;
        *value = (1.0 - alpha) * *value + alpha * reward;
        Ok(())
    }

    /// Number of states in the table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no state has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the recorded states.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.values.keys()
    }

    fn row(&self, state: &State) -> Result<&HashMap<Action, f64>> {
        self.values.get(state).ok_or_else(|| Error::UnvisitedState {
            state: state.to_string(),
        })
    }
}
