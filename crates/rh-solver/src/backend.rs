//! The `LpSolver` trait and backend selection.

use std::time::Duration;

use rh_core::{SolverConfig, SolverDriver};

use crate::{LinearProgram, MinilpSolver, SolverError, SolverResult, VarId};

/// Per-solve options taken from the `[solver]` config section.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SolveOptions {
    pub time_limit: Option<Duration>,
    pub mip_gap:    Option<f64>,
}

impl SolveOptions {
    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            time_limit: config.time_limit.map(Duration::from_secs_f64),
            mip_gap:    config.mip_gap,
        }
    }
}

/// Optimal column values of a solved [`LinearProgram`].
#[derive(Clone, Debug, PartialEq)]
pub struct LpSolution {
    pub objective: f64,
    pub values:    Vec<f64>,
}

impl LpSolution {
    #[inline]
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }
}

/// A numeric LP backend.
///
/// Implementations either return an optimal solution or an explicit status
/// error.  They must never return a partial or clamped solution.
pub trait LpSolver: Send + Sync {
    /// Backend name recorded in the run manifest.
    fn name(&self) -> &str;

    fn solve(&self, lp: &LinearProgram, options: &SolveOptions) -> SolverResult<LpSolution>;
}

/// Backend for the configured driver.
pub fn solver_for(driver: SolverDriver) -> SolverResult<Box<dyn LpSolver>> {
    match driver {
        SolverDriver::Auto | SolverDriver::InProcess => Ok(Box::new(MinilpSolver::new())),
        SolverDriver::Exec => Err(SolverError::UnsupportedDriver("exec")),
    }
}

/// Fail with `TimeLimit` if `elapsed` overran `limit`.
pub fn check_deadline(elapsed: Duration, limit: Option<Duration>) -> SolverResult<()> {
    match limit {
        Some(limit) if elapsed > limit => Err(SolverError::TimeLimit { elapsed, limit }),
        _ => Ok(()),
    }
}
