use thiserror::Error;

use crate::input::InputError;

/// Failures of the ranking core. All of them are fatal for the computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    #[error("all score lists must be the same length (got lengths {lengths:?})")]
    LengthMismatch { lengths: Vec<usize> },

    #[error("submission '{submission}' is missing required metric '{metric}'")]
    MissingMetric { submission: String, metric: String },

    #[error("empty input: {0}")]
    EmptyInput(String),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Rank(#[from] RankError),

    #[error("failed to write reports: {0}")]
    Report(#[from] std::io::Error),

    #[error("invalid arguments: {0}")]
    Args(String),
}
