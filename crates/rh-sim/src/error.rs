//! Error types for rh-sim.

use thiserror::Error;

use rh_agent::ReactorError;
use rh_core::{CoreError, Period};
use rh_principal::PrincipalError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] CoreError),

    /// Policy resolution or parameter errors at build time.
    #[error(transparent)]
    Policy(#[from] PrincipalError),

    /// Reactor resolution or parameter errors at build time.
    #[error(transparent)]
    Reactor(#[from] ReactorError),

    /// `period` is where the bounds conflict; `window_start` is the
    /// decision period whose window failed.
    #[error("window model infeasible at period {} (window starting at {})", period.0, window_start.0)]
    ModelInfeasible { period: Period, window_start: Period },

    #[error("window model unbounded at period {}", period.0)]
    ModelUnbounded { period: Period },

    #[error("solver exceeded the {limit_secs}s time limit at period {}", period.0)]
    SolverTimeout { period: Period, limit_secs: f64 },

    #[error("window model failed at period {}: {source}", period.0)]
    Model {
        period: Period,
        #[source]
        source: PrincipalError,
    },

    #[error("agent reactor failed at period {}: {source}", period.0)]
    ReactorFailed {
        period: Period,
        #[source]
        source: ReactorError,
    },

    /// The reactor answered, but not within its contract.
    #[error("agent reactor broke its contract at period {}: {reason}", period.0)]
    ReactorContract { period: Period, reason: String },
}

impl SimError {
    /// Period at which a run-time failure happened.  `None` for build-time
    /// errors.
    pub fn period(&self) -> Option<Period> {
        match self {
            SimError::ModelInfeasible { period, .. }
            | SimError::ModelUnbounded { period }
            | SimError::SolverTimeout { period, .. }
            | SimError::Model { period, .. }
            | SimError::ReactorFailed { period, .. }
            | SimError::ReactorContract { period, .. } => Some(*period),
            _ => None,
        }
    }

    /// Map a window-solve failure to the run-level taxonomy.
    pub(crate) fn from_model(period: Period, err: PrincipalError) -> Self {
        match err {
            PrincipalError::Infeasible { period, window_start } => {
                SimError::ModelInfeasible { period, window_start }
            }
            PrincipalError::Unbounded { period } => SimError::ModelUnbounded { period },
            PrincipalError::TimeLimit { period, limit } => {
                SimError::SolverTimeout { period, limit_secs: limit.as_secs_f64() }
            }
            source => SimError::Model { period, source },
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
