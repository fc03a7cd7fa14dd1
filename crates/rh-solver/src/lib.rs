//! `rh-solver` — linear programs and the backends that solve them.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`program`]  | `LinearProgram`, `VarId`, `Sense`, `Cmp`, `Row`              |
//! | [`backend`]  | `LpSolver` trait, `SolveOptions`, `LpSolution`, `solver_for` |
//! | [`simplex`]  | `MinilpSolver` — in-process dense simplex                    |
//! | [`error`]    | `SolverError`, `SolverResult<T>`                             |
//!
//! # Design notes
//!
//! Model builders describe a problem once as a [`LinearProgram`] and never
//! see backend types.  A backend turns it into a numeric [`LpSolution`] or an
//! explicit status error (infeasible, unbounded, over the time limit).  The
//! solve is a single blocking call: the deadline is checked when it returns
//! and an overrun discards the solution.

pub mod backend;
pub mod error;
pub mod program;
pub mod simplex;

#[cfg(test)]
mod tests;

pub use backend::{LpSolution, LpSolver, SolveOptions, check_deadline, solver_for};
pub use error::{SolverError, SolverResult};
pub use program::{Cmp, LinearProgram, Row, Sense, VarId, Variable};
pub use simplex::MinilpSolver;
