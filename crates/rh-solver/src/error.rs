use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("problem is infeasible")]
    Infeasible,

    #[error("problem is unbounded")]
    Unbounded,

    #[error("solve took {elapsed:?}, over the {limit:?} time limit")]
    TimeLimit { elapsed: Duration, limit: Duration },

    /// The program itself is malformed (non-finite coefficient, bad bounds).
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("solver backend error: {0}")]
    Backend(String),

    #[error("solver driver `{0}` is not available")]
    UnsupportedDriver(&'static str),
}

pub type SolverResult<T> = Result<T, SolverError>;
