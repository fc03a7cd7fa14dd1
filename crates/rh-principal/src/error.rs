use std::time::Duration;

use thiserror::Error;

use rh_core::Period;
use rh_solver::SolverError;

#[derive(Debug, Error)]
pub enum PrincipalError {
    /// `period` is the first window period whose own bounds cannot be met,
    /// or `window_start` when the conflict spans several periods.
    #[error("window starting at {window_start} is infeasible at {period}")]
    Infeasible { period: Period, window_start: Period },

    #[error("window starting at {period} is unbounded")]
    Unbounded { period: Period },

    #[error("solve of window starting at {period} exceeded the {limit:?} time limit")]
    TimeLimit { period: Period, limit: Duration },

    #[error("solver failed on window starting at {period}: {source}")]
    Solver {
        period: Period,
        #[source]
        source: SolverError,
    },

    #[error("unknown principal policy {0:?}")]
    UnknownPolicy(String),

    #[error("invalid policy parameter `{name}`: {reason}")]
    InvalidParam { name: String, reason: String },

    /// The remaining-area vector does not match the dataset.
    #[error("state has {got} strata, problem data has {expected}")]
    StateMismatch { expected: usize, got: usize },
}

impl PrincipalError {
    pub(crate) fn param(name: impl Into<String>, reason: impl Into<String>) -> Self {
        PrincipalError::InvalidParam { name: name.into(), reason: reason.into() }
    }
}

pub type PrincipalResult<T> = Result<T, PrincipalError>;
