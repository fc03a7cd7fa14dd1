//! Objective policies and the name-keyed registry that selects them.

use std::collections::BTreeMap;

use rh_core::Params;
use rh_solver::{Cmp, Sense};

use crate::{PolicyParams, PrincipalError, PrincipalResult, WindowModelBuilder};

/// Shapes the objective of a window model.
///
/// `apply` runs after every constraint row is in place.  It may add
/// auxiliary columns and rows to linearise its objective, but must not
/// tighten or relax the window's constraint set.
///
/// # Example
///
/// ```rust,ignore
/// struct FirstPeriodOnly;
///
/// impl PrincipalPolicy for FirstPeriodOnly {
///     fn name(&self) -> &str { "first_period_only" }
///
///     fn apply(&self, b: &mut WindowModelBuilder<'_>, _: &PolicyParams) -> PrincipalResult<()> {
///         for (var, y) in b.volume_terms(0) {
///             b.lp_mut().set_objective(var, y);
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait PrincipalPolicy: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, builder: &mut WindowModelBuilder<'_>, params: &PolicyParams) -> PrincipalResult<()>;
}

// ── Built-ins ─────────────────────────────────────────────────────────────────

/// Maximize total window volume, with a small decay toward later periods.
#[derive(Default)]
pub struct MaxVolume;

impl PrincipalPolicy for MaxVolume {
    fn name(&self) -> &str {
        "max_volume"
    }

    fn apply(&self, b: &mut WindowModelBuilder<'_>, params: &PolicyParams) -> PrincipalResult<()> {
        b.lp_mut().set_sense(Sense::Maximize);
        for k in 0..b.window().len() {
            let w = params.preference_weight(k);
            for (var, y) in b.volume_terms(k) {
                b.lp_mut().set_objective(var, w * y);
            }
        }
        Ok(())
    }
}

/// Maximize volume minus `deviation_penalty · Σ_k |vol_k − mean|`.
///
/// Each absolute deviation is a column `d[k] >= 0` with
/// `d[k] >= vol_k − mean` and `d[k] >= mean − vol_k`.
#[derive(Default)]
pub struct EvenFlow;

impl PrincipalPolicy for EvenFlow {
    fn name(&self) -> &str {
        "even_flow"
    }

    fn apply(&self, b: &mut WindowModelBuilder<'_>, params: &PolicyParams) -> PrincipalResult<()> {
        MaxVolume.apply(b, params)?;

        let len = b.window().len();
        if len < 2 || params.deviation_penalty == 0.0 {
            return Ok(());
        }
        let inv_len = 1.0 / len as f64;
        let per_period: Vec<_> = (0..len).map(|k| b.volume_terms(k)).collect();

        for k in 0..len {
            let period = (b.window().start() + k as u32).0;
            let d = b.lp_mut().add_var(format!("dev[{period}]"), 0.0, f64::INFINITY, -params.deviation_penalty);

            // vol_k − mean, as terms over every x in the window.
            let mut diff = Vec::with_capacity(len * per_period[0].len() + 1);
            for (j, terms) in per_period.iter().enumerate() {
                let delta = if j == k { 1.0 } else { 0.0 };
                diff.extend(terms.iter().map(|&(v, y)| (v, y * (delta - inv_len))));
            }
            let mut above = diff.clone();
            above.push((d, -1.0));
            b.lp_mut().add_row(format!("dev_hi[{period}]"), above, Cmp::Le, 0.0);

            let mut below: Vec<_> = diff.into_iter().map(|(v, a)| (v, -a)).collect();
            below.push((d, -1.0));
            b.lp_mut().add_row(format!("dev_lo[{period}]"), below, Cmp::Le, 0.0);
        }
        Ok(())
    }
}

/// Maximize discounted margin `Σ (price[species] − harvest cost) · vol`.
///
/// Missing prices or costs read as `0.0`.
#[derive(Default)]
pub struct Revenue;

impl PrincipalPolicy for Revenue {
    fn name(&self) -> &str {
        "revenue"
    }

    fn apply(&self, b: &mut WindowModelBuilder<'_>, params: &PolicyParams) -> PrincipalResult<()> {
        b.lp_mut().set_sense(Sense::Maximize);
        let data = b.data();
        let harvest_cost = data.cost("harvest").unwrap_or(0.0);
        for k in 0..b.window().len() {
            let w = params.discount_factor(k) * params.preference_weight(k);
            for s in data.stratum_indices() {
                let price = data.price(&data.stratum(s).species).unwrap_or(0.0);
                let coeff = (price - harvest_cost) * b.yield_coeff(s, k) * w;
                let var = b.x(s, k);
                b.lp_mut().set_objective(var, coeff);
            }
        }
        Ok(())
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Builds a policy from the raw `principal_policy.params` table.
pub type PolicyFactory = Box<dyn Fn(&Params) -> PrincipalResult<Box<dyn PrincipalPolicy>> + Send + Sync>;

/// Name → policy factory.  Constructed at startup and passed to the
/// simulator; there is no process-wide registry.
#[derive(Default)]
pub struct PolicyRegistry {
    factories: BTreeMap<String, PolicyFactory>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `max_volume`, `even_flow` and `revenue`.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register("max_volume", |_| Ok(Box::new(MaxVolume)));
        reg.register("even_flow", |_| Ok(Box::new(EvenFlow)));
        reg.register("revenue", |_| Ok(Box::new(Revenue)));
        reg
    }

    /// Add or replace the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Params) -> PrincipalResult<Box<dyn PrincipalPolicy>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn create(&self, name: &str, params: &Params) -> PrincipalResult<Box<dyn PrincipalPolicy>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PrincipalError::UnknownPolicy(name.to_string()))?;
        factory(params)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}
