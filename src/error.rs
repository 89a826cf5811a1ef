//! Error types for the smartcab crate

use thiserror::Error;

/// Main error type for the smartcab crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("state '{state}' was never created in the Q-table")]
    UnvisitedState { state: String },

    #[error("no Q-value recorded for action '{action}' in state '{state}'")]
    MissingQValue { state: String, action: String },

    #[error("no actions available for selection")]
    NoActionsAvailable,

    #[error("missing percept field '{field}'")]
    MissingPercept { field: &'static str },

    #[error("invalid direction '{input}'. Expected one of: {expected}")]
    ParseDirection { input: String, expected: String },

    #[error("invalid traffic light '{input}'. Expected one of: {expected}")]
    ParseTrafficLight { input: String, expected: String },

    #[error("invalid action '{input}'. Expected one of: {expected}")]
    ParseAction { input: String, expected: String },

    #[error("invalid decay schedule '{input}': {reason}")]
    ParseDecaySchedule { input: String, reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("route already complete; no further maneuvers to score")]
    RouteComplete,

    #[error("shared world lock failed during {operation}")]
    WorldPoisoned { operation: &'static str },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
