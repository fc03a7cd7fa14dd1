//! Solver-neutral linear program.

use std::fmt;

use crate::{SolverError, SolverResult};

/// Column index in a [`LinearProgram`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct VarId(pub u32);

impl VarId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarId({})", self.0)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// Row comparison operator.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Cmp {
    Le,
    Ge,
    Eq,
}

impl fmt::Display for Cmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cmp::Le => "<=",
            Cmp::Ge => ">=",
            Cmp::Eq => "=",
        })
    }
}

#[derive(Clone, Debug)]
pub struct Variable {
    pub name:      String,
    pub lower:     f64,
    /// `f64::INFINITY` for no upper bound.
    pub upper:     f64,
    pub objective: f64,
}

/// `Σ coeff · x  {<=, >=, =}  rhs`
#[derive(Clone, Debug)]
pub struct Row {
    pub name:  String,
    pub terms: Vec<(VarId, f64)>,
    pub cmp:   Cmp,
    pub rhs:   f64,
}

impl Row {
    /// Left-hand side evaluated at `values`.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(v, a)| a * values[v.index()]).sum()
    }

    /// Whether `values` satisfy this row within `tol`.
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.activity(values);
        match self.cmp {
            Cmp::Le => lhs <= self.rhs + tol,
            Cmp::Ge => lhs >= self.rhs - tol,
            Cmp::Eq => (lhs - self.rhs).abs() <= tol,
        }
    }
}

/// A linear program: bounded columns with objective coefficients plus rows.
///
/// Columns and rows keep insertion order, so two identical build sequences
/// produce identical programs.
#[derive(Clone, Debug)]
pub struct LinearProgram {
    sense: Sense,
    vars:  Vec<Variable>,
    rows:  Vec<Row>,
}

impl LinearProgram {
    pub fn new(sense: Sense) -> Self {
        Self { sense, vars: Vec::new(), rows: Vec::new() }
    }

    #[inline]
    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn set_sense(&mut self, sense: Sense) {
        self.sense = sense;
    }

    pub fn add_var(&mut self, name: impl Into<String>, lower: f64, upper: f64, objective: f64) -> VarId {
        let id = VarId(self.vars.len() as u32);
        self.vars.push(Variable { name: name.into(), lower, upper, objective });
        id
    }

    pub fn set_objective(&mut self, var: VarId, coeff: f64) {
        self.vars[var.index()].objective = coeff;
    }

    /// Reset every objective coefficient to zero.
    pub fn clear_objective(&mut self) {
        for v in &mut self.vars {
            v.objective = 0.0;
        }
    }

    pub fn add_row(
        &mut self,
        name:  impl Into<String>,
        terms: Vec<(VarId, f64)>,
        cmp:   Cmp,
        rhs:   f64,
    ) -> usize {
        self.rows.push(Row { name: name.into(), terms, cmp, rhs });
        self.rows.len() - 1
    }

    #[inline]
    pub fn var(&self, id: VarId) -> &Variable {
        &self.vars[id.index()]
    }

    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Objective value at `values`.
    pub fn objective_at(&self, values: &[f64]) -> f64 {
        self.vars.iter().zip(values).map(|(v, x)| v.objective * x).sum()
    }

    /// Name of the first row or bound violated by `values`, if any.
    pub fn first_violation(&self, values: &[f64], tol: f64) -> Option<&str> {
        for (v, &x) in self.vars.iter().zip(values) {
            if x < v.lower - tol || x > v.upper + tol {
                return Some(&v.name);
            }
        }
        self.rows.iter().find(|r| !r.is_satisfied(values, tol)).map(|r| r.name.as_str())
    }

    /// Reject programs no backend can solve meaningfully.
    pub fn validate(&self) -> SolverResult<()> {
        for v in &self.vars {
            if v.lower.is_nan() || v.upper.is_nan() || v.lower > v.upper {
                return Err(SolverError::InvalidModel(format!(
                    "variable {} has bounds [{}, {}]",
                    v.name, v.lower, v.upper
                )));
            }
            if !v.objective.is_finite() {
                return Err(SolverError::InvalidModel(format!(
                    "variable {} has objective coefficient {}",
                    v.name, v.objective
                )));
            }
        }
        for r in &self.rows {
            if !r.rhs.is_finite() || r.terms.iter().any(|&(_, a)| !a.is_finite()) {
                return Err(SolverError::InvalidModel(format!("row {} has a non-finite coefficient", r.name)));
            }
            if let Some(&(v, _)) = r.terms.iter().find(|(v, _)| v.index() >= self.vars.len()) {
                return Err(SolverError::InvalidModel(format!("row {} references unknown {v}", r.name)));
            }
        }
        Ok(())
    }
}
