//! The windowed allocation model.
//!
//! # Variables
//!
//! One column `x[s, k]` per stratum `s` and window offset `k`: area of `s`
//! allocated in period `t + k`, with `x >= 0`.  Columns are laid out
//! stratum-major (`s * len + k`).
//!
//! # Rows
//!
//! | Row                | Form                                                   |
//! |--------------------|--------------------------------------------------------|
//! | `area[s]`          | `Σ_k x[s,k] <= remaining[s]`                           |
//! | `cap[k]`           | `Σ_s y[s,k]·x[s,k] <= Σ_s y[s,k]·remaining[s]`         |
//! | `demand_lo[k]`     | `Σ_s y[s,k]·x[s,k] >= min_vol[k]` (policy-gated)       |
//! | `demand_hi[k]`     | `Σ_s y[s,k]·x[s,k] <= max_vol[k]` (policy-gated)       |
//! | `min_flow`         | `Σ_s y[s,0]·x[s,0] >= min_flow` (offset 0 only)        |

use tracing::debug;

use rh_core::{Period, StratumIdx, Window};
use rh_data::ProblemData;
use rh_solver::{Cmp, LinearProgram, LpSolver, Sense, SolveOptions, SolverError, VarId};

use crate::{PolicyParams, PrincipalError, PrincipalPolicy, PrincipalResult};

// ── WindowModelBuilder ────────────────────────────────────────────────────────

/// A window's linear program with its constraint set already in place.
///
/// Handed to [`PrincipalPolicy::apply`], which sets the objective.
pub struct WindowModelBuilder<'a> {
    data:      &'a ProblemData,
    remaining: &'a [f64],
    window:    Window,
    lp:        LinearProgram,
    x:         Vec<VarId>,
}

impl<'a> WindowModelBuilder<'a> {
    /// Add the `x` columns and every constraint row for `window`.
    pub fn new(
        data:      &'a ProblemData,
        remaining: &'a [f64],
        window:    Window,
        params:    &PolicyParams,
    ) -> PrincipalResult<Self> {
        if remaining.len() != data.stratum_count() {
            return Err(PrincipalError::StateMismatch {
                expected: data.stratum_count(),
                got:      remaining.len(),
            });
        }
        let len = window.len();
        let mut lp = LinearProgram::new(Sense::Maximize);
        let mut x = Vec::with_capacity(data.stratum_count() * len);
        for s in data.stratum_indices() {
            let id = &data.stratum(s).id;
            for p in window.periods() {
                x.push(lp.add_var(format!("x[{id},{}]", p.0), 0.0, f64::INFINITY, 0.0));
            }
        }

        let mut builder = Self { data, remaining, window, lp, x };

        // ── Area conservation ─────────────────────────────────────────────
        for s in data.stratum_indices() {
            let terms = (0..len).map(|k| (builder.x(s, k), 1.0)).collect();
            let rhs = remaining[s.index()].max(0.0);
            builder.lp.add_row(format!("area[{}]", data.stratum(s).id), terms, Cmp::Le, rhs);
        }

        for (k, p) in window.periods().enumerate() {
            let terms = builder.volume_terms(k);

            // ── Physical cap ──────────────────────────────────────────────
            let cap = physical_cap(data, remaining, p);
            builder.lp.add_row(format!("cap[{}]", p.0), terms.clone(), Cmp::Le, cap);

            // ── Demand bounds ─────────────────────────────────────────────
            if params.enforce_demand {
                if let Some(bounds) = data.demand_bounds(p) {
                    if bounds.min > 0.0 {
                        builder.lp.add_row(format!("demand_lo[{}]", p.0), terms.clone(), Cmp::Ge, bounds.min);
                    }
                    builder.lp.add_row(format!("demand_hi[{}]", p.0), terms.clone(), Cmp::Le, bounds.max);
                }
            }

            // ── Minimum flow: first period only ───────────────────────────
            if k == 0 {
                if let Some(min_flow) = params.min_flow {
                    builder.lp.add_row("min_flow", terms, Cmp::Ge, min_flow);
                }
            }
        }

        Ok(builder)
    }

    #[inline]
    pub fn data(&self) -> &'a ProblemData {
        self.data
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    #[inline]
    pub fn remaining(&self) -> &[f64] {
        self.remaining
    }

    /// Column of `x[s, k]`.
    #[inline]
    pub fn x(&self, s: StratumIdx, k: usize) -> VarId {
        self.x[s.index() * self.window.len() + k]
    }

    /// Yield of `s` at window offset `k`.
    #[inline]
    pub fn yield_coeff(&self, s: StratumIdx, k: usize) -> f64 {
        self.data.yield_at(s, self.window.start() + k as u32)
    }

    /// `(x[s,k], y[s,k])` for every stratum: the aggregate volume at offset `k`.
    pub fn volume_terms(&self, k: usize) -> Vec<(VarId, f64)> {
        self.data
            .stratum_indices()
            .map(|s| (self.x(s, k), self.yield_coeff(s, k)))
            .collect()
    }

    pub fn lp(&self) -> &LinearProgram {
        &self.lp
    }

    pub fn lp_mut(&mut self) -> &mut LinearProgram {
        &mut self.lp
    }

    pub fn into_program(self) -> LinearProgram {
        self.lp
    }
}

/// `Σ_s y[s,p]·remaining[s]`: the most volume period `p` could yield.
fn physical_cap(data: &ProblemData, remaining: &[f64], p: Period) -> f64 {
    data.stratum_indices()
        .map(|s| data.yield_at(s, p) * remaining[s.index()].max(0.0))
        .sum()
}

/// First period of `window` whose lower bound (demand or minimum flow)
/// exceeds its physical cap on its own.
///
/// `None` when every period is individually satisfiable, i.e. the conflict
/// comes from several periods competing for the same area.
pub fn first_conflict_period(
    data:      &ProblemData,
    remaining: &[f64],
    window:    Window,
    params:    &PolicyParams,
) -> Option<Period> {
    window.periods().enumerate().find_map(|(k, p)| {
        let cap = physical_cap(data, remaining, p);
        let demand_lo = params
            .enforce_demand
            .then(|| data.demand_bounds(p).map(|b| b.min))
            .flatten()
            .unwrap_or(0.0);
        let min_flow = if k == 0 { params.min_flow.unwrap_or(0.0) } else { 0.0 };
        let lower = demand_lo.max(min_flow);
        (lower > cap + CONFLICT_TOL * cap.abs().max(1.0)).then_some(p)
    })
}

/// Relative slack before a lower bound counts as above the cap.
const CONFLICT_TOL: f64 = 1e-9;

// ── WindowSolution ────────────────────────────────────────────────────────────

/// Per-`(stratum, period)` values of a solved window.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowSolution {
    window:      Window,
    objective:   f64,
    stratum_ids: Vec<String>,
    /// `x[s, k]`, stratum-major.
    area:        Vec<f64>,
    /// `x[s, k] · y[s, k]`, stratum-major.
    volume:      Vec<f64>,
    /// Aggregate volume per offset.
    aggregate:   Vec<f64>,
}

impl WindowSolution {
    /// Assemble a solution from raw slices.
    ///
    /// `area` and `volume` are stratum-major with `window.len()` entries per
    /// stratum; `aggregate` has one entry per window period.
    pub fn from_parts(
        window:      Window,
        objective:   f64,
        stratum_ids: Vec<String>,
        area:        Vec<f64>,
        volume:      Vec<f64>,
        aggregate:   Vec<f64>,
    ) -> Self {
        debug_assert_eq!(area.len(), stratum_ids.len() * window.len());
        debug_assert_eq!(volume.len(), area.len());
        debug_assert_eq!(aggregate.len(), window.len());
        Self { window, objective, stratum_ids, area, volume, aggregate }
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn stratum_count(&self) -> usize {
        self.stratum_ids.len()
    }

    pub fn stratum_id(&self, s: StratumIdx) -> &str {
        &self.stratum_ids[s.index()]
    }

    fn slot(&self, s: StratumIdx, p: Period) -> Option<usize> {
        let k = self.window.offset_of(p)?;
        Some(s.index() * self.window.len() + k)
    }

    /// `x[s, p]`; `0.0` outside the window.
    pub fn area(&self, s: StratumIdx, p: Period) -> f64 {
        self.slot(s, p).map_or(0.0, |i| self.area[i])
    }

    pub fn volume(&self, s: StratumIdx, p: Period) -> f64 {
        self.slot(s, p).map_or(0.0, |i| self.volume[i])
    }

    /// Total volume across strata in period `p`.
    pub fn aggregate_volume(&self, p: Period) -> f64 {
        self.window.offset_of(p).map_or(0.0, |k| self.aggregate[k])
    }

    /// Total area allocated from `s` over the whole window.
    pub fn stratum_area_total(&self, s: StratumIdx) -> f64 {
        let len = self.window.len();
        self.area[s.index() * len..(s.index() + 1) * len].iter().sum()
    }

    pub fn strata(&self) -> impl Iterator<Item = StratumIdx> + '_ {
        (0..self.stratum_ids.len() as u32).map(StratumIdx)
    }
}

// ── AllocationModel ───────────────────────────────────────────────────────────

/// Builds and solves one window per call.
pub struct AllocationModel {
    policy:  Box<dyn PrincipalPolicy>,
    params:  PolicyParams,
    solver:  Box<dyn LpSolver>,
    options: SolveOptions,
}

impl AllocationModel {
    pub fn new(
        policy:  Box<dyn PrincipalPolicy>,
        params:  PolicyParams,
        solver:  Box<dyn LpSolver>,
        options: SolveOptions,
    ) -> Self {
        Self { policy, params, solver, options }
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    pub fn params(&self) -> &PolicyParams {
        &self.params
    }

    /// Build the window program with the policy's objective applied.
    pub fn build<'a>(
        &self,
        data:      &'a ProblemData,
        remaining: &'a [f64],
        window:    Window,
    ) -> PrincipalResult<WindowModelBuilder<'a>> {
        let mut builder = WindowModelBuilder::new(data, remaining, window, &self.params)?;
        self.policy.apply(&mut builder, &self.params)?;
        Ok(builder)
    }

    /// Solve `window` against the current remaining areas.
    ///
    /// Infeasible, unbounded and over-time windows are returned as errors;
    /// nothing is clamped or retried.  An infeasible window names the period
    /// found by [`first_conflict_period`], falling back to the window's first
    /// period.
    pub fn build_and_solve(
        &self,
        data:      &ProblemData,
        remaining: &[f64],
        window:    Window,
    ) -> PrincipalResult<WindowSolution> {
        let period = window.start();
        let builder = self.build(data, remaining, window)?;
        debug!(
            window = %window,
            policy = self.policy.name(),
            vars = builder.lp().num_vars(),
            rows = builder.lp().num_rows(),
            "window model built"
        );

        let solution = self
            .solver
            .solve(builder.lp(), &self.options)
            .map_err(|e| match e {
                SolverError::Infeasible => PrincipalError::Infeasible {
                    period: first_conflict_period(data, remaining, window, &self.params).unwrap_or(period),
                    window_start: period,
                },
                SolverError::Unbounded => PrincipalError::Unbounded { period },
                SolverError::TimeLimit { limit, .. } => PrincipalError::TimeLimit { period, limit },
                source => PrincipalError::Solver { period, source },
            })?;

        let len = window.len();
        let n = data.stratum_count();
        let mut area = Vec::with_capacity(n * len);
        let mut volume = Vec::with_capacity(n * len);
        let mut aggregate = vec![0.0; len];
        for s in data.stratum_indices() {
            for k in 0..len {
                // Simplex noise can leave tiny negatives on zero columns.
                let a = solution.value(builder.x(s, k)).max(0.0);
                let v = a * builder.yield_coeff(s, k);
                area.push(a);
                volume.push(v);
                aggregate[k] += v;
            }
        }
        let stratum_ids = data.strata().iter().map(|s| s.id.clone()).collect();

        Ok(WindowSolution::from_parts(window, solution.objective, stratum_ids, area, volume, aggregate))
    }
}
