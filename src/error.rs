//! Crate error type.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced by the scheduling pipeline.
///
/// Unschedulable offspring inside the optimizer are never reported here;
/// they are replaced silently and counted in
/// [`GaResult::fallbacks`](crate::ga::GaResult::fallbacks).
#[derive(Debug, Error)]
pub enum Error {
    /// Input failed structural validation.
    #[error("invalid input: {}", format_validation(.0))]
    Validation(Vec<ValidationError>),
    /// No assignment satisfies the constraints under the dependency order.
    #[error("no feasible schedule exists")]
    Infeasible,
    /// The optimizer was seeded with a schedule that fails validation.
    #[error("seed schedule is not valid")]
    InvalidSeed,
    /// Optimizer configuration is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Task ID not present in the instance.
    #[error("unknown task: {0}")]
    UnknownTask(String),
    /// Agent ID not present in the instance.
    #[error("unknown agent: {0}")]
    UnknownAgent(String),
    /// Scenario file could not be read or written.
    #[error("scenario I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Scenario JSON could not be parsed or produced.
    #[error("scenario JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
