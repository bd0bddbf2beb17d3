//! Error types for the sequential decision model

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("no feasible actions at stage {stage}")]
    NoFeasibleActions { stage: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("weight '{name}' = {value} must be non-negative and finite")]
    InvalidWeight { name: String, value: f64 },

    #[error("unknown parameter '{name}' for policy family '{family}' (expected one of: {expected})")]
    UnknownParameter {
        name: String,
        family: String,
        expected: String,
    },

    #[error("unknown decision identifier '{identifier}'")]
    UnknownDecision { identifier: String },

    #[error("invalid parameter specification '{input}': {reason}")]
    ParseParameter { input: String, reason: String },

    #[error("no valid playthrough exports found in '{directory}'")]
    NoValidExports { directory: String },

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

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
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
