//! In-process backend on top of the `minilp` dense simplex.

use std::time::Instant;

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};
use tracing::debug;

use crate::{
    Cmp, LinearProgram, LpSolution, LpSolver, Sense, SolveOptions, SolverError, SolverResult,
    check_deadline,
};

/// Pure-Rust simplex solver.  LP only: `mip_gap` is ignored.
#[derive(Default)]
pub struct MinilpSolver;

impl MinilpSolver {
    pub fn new() -> Self {
        MinilpSolver
    }
}

impl LpSolver for MinilpSolver {
    fn name(&self) -> &str {
        "minilp"
    }

    fn solve(&self, lp: &LinearProgram, options: &SolveOptions) -> SolverResult<LpSolution> {
        lp.validate()?;
        if let Some(gap) = options.mip_gap {
            debug!(mip_gap = gap, "mip_gap ignored by the LP backend");
        }
        if lp.num_vars() == 0 {
            return Ok(LpSolution { objective: 0.0, values: Vec::new() });
        }

        let start = Instant::now();

        let direction = match lp.sense() {
            Sense::Maximize => OptimizationDirection::Maximize,
            Sense::Minimize => OptimizationDirection::Minimize,
        };
        let mut problem = Problem::new(direction);
        let columns: Vec<minilp::Variable> = lp
            .vars()
            .iter()
            .map(|v| problem.add_var(v.objective, (v.lower, v.upper)))
            .collect();

        for row in lp.rows() {
            let mut expr = LinearExpr::empty();
            for &(var, coeff) in &row.terms {
                expr.add(columns[var.index()], coeff);
            }
            let op = match row.cmp {
                Cmp::Le => ComparisonOp::Le,
                Cmp::Ge => ComparisonOp::Ge,
                Cmp::Eq => ComparisonOp::Eq,
            };
            problem.add_constraint(expr, op, row.rhs);
        }

        let solved = problem.solve();
        check_deadline(start.elapsed(), options.time_limit)?;

        let solution = solved.map_err(|e| match e {
            minilp::Error::Infeasible => SolverError::Infeasible,
            minilp::Error::Unbounded => SolverError::Unbounded,
        })?;

        let values: Vec<f64> = columns.iter().map(|&c| solution[c]).collect();
        debug!(
            vars = lp.num_vars(),
            rows = lp.num_rows(),
            objective = solution.objective(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "lp solved"
        );
        Ok(LpSolution { objective: solution.objective(), values })
    }
}
