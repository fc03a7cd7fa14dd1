//! `ProblemData` and its validating builder.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use rh_core::{Period, StratumIdx};

use crate::{DataError, DataResult, DemandBounds, PeriodDemand, Stratum};

#[cfg(not(feature = "fx-hash"))]
type YieldMap = HashMap<(StratumIdx, Period), f64>;
#[cfg(feature = "fx-hash")]
type YieldMap = rustc_hash::FxHashMap<(StratumIdx, Period), f64>;

// ── ProblemData ───────────────────────────────────────────────────────────────

/// Immutable per-run dataset: strata, absolute-period yields, demand bounds,
/// prices, and costs.
///
/// Strata are stored densely and addressed by [`StratumIdx`]; the model
/// builder iterates them in index order, which keeps variable layout (and
/// therefore solver output) deterministic.
#[derive(Clone, Debug)]
pub struct ProblemData {
    strata: Vec<Stratum>,
    index:  HashMap<String, StratumIdx>,
    yields: YieldMap,
    demand: Vec<PeriodDemand>,
    /// Aggregated bounds keyed by period.
    bounds: BTreeMap<u32, DemandBounds>,
    prices: BTreeMap<String, f64>,
    costs:  BTreeMap<String, f64>,
}

impl ProblemData {
    pub fn builder() -> ProblemDataBuilder {
        ProblemDataBuilder::default()
    }

    #[inline]
    pub fn strata(&self) -> &[Stratum] {
        &self.strata
    }

    #[inline]
    pub fn stratum_count(&self) -> usize {
        self.strata.len()
    }

    #[inline]
    pub fn stratum(&self, idx: StratumIdx) -> &Stratum {
        &self.strata[idx.index()]
    }

    /// All stratum indices in ascending order.
    pub fn stratum_indices(&self) -> impl Iterator<Item = StratumIdx> + '_ {
        (0..self.strata.len() as u32).map(StratumIdx)
    }

    pub fn stratum_index(&self, id: &str) -> Option<StratumIdx> {
        self.index.get(id).copied()
    }

    /// Volume per unit area for `stratum` in absolute period `period`.
    ///
    /// Missing entries read as `0.0` (nothing harvestable).
    #[inline]
    pub fn yield_at(&self, stratum: StratumIdx, period: Period) -> f64 {
        self.yields.get(&(stratum, period)).copied().unwrap_or(0.0)
    }

    /// Number of stored (stratum, period) yield entries.
    pub fn yield_count(&self) -> usize {
        self.yields.len()
    }

    /// Smallest and largest period with a stored yield.
    pub fn yield_period_range(&self) -> Option<(Period, Period)> {
        let min = self.yields.keys().map(|&(_, p)| p).min()?;
        let max = self.yields.keys().map(|&(_, p)| p).max()?;
        Some((min, max))
    }

    pub fn demand(&self) -> &[PeriodDemand] {
        &self.demand
    }

    /// Aggregate demand bounds for `period`, if any demand row names it.
    ///
    /// Rows are summed regardless of species, so the bound applies to the
    /// volume of every stratum.
    pub fn demand_bounds(&self, period: Period) -> Option<DemandBounds> {
        self.bounds.get(&period.0).copied()
    }

    /// Species with strata in the dataset but no demand row for `period`.
    ///
    /// Empty when `period` has no demand at all.
    pub fn demand_uncovered_species(&self, period: Period) -> Vec<&str> {
        let named: BTreeSet<&str> = self
            .demand
            .iter()
            .filter(|d| d.period == period.0)
            .map(|d| d.species.as_str())
            .collect();
        if named.is_empty() {
            return Vec::new();
        }
        let present: BTreeSet<&str> = self.strata.iter().map(|s| s.species.as_str()).collect();
        present.difference(&named).copied().collect()
    }

    pub fn price(&self, species: &str) -> Option<f64> {
        self.prices.get(species).copied()
    }

    pub fn cost(&self, name: &str) -> Option<f64> {
        self.costs.get(name).copied()
    }

    pub fn prices(&self) -> &BTreeMap<String, f64> {
        &self.prices
    }

    pub fn costs(&self) -> &BTreeMap<String, f64> {
        &self.costs
    }

    /// Sum of all stratum areas.
    pub fn total_area(&self) -> f64 {
        self.strata.iter().map(|s| s.area).sum()
    }

    /// Flatten back into the serializable document form.
    pub fn to_document(&self) -> ProblemDocument {
        let mut yields: Vec<YieldRow> = self
            .yields
            .iter()
            .map(|(&(s, p), &value)| YieldRow {
                stratum: self.strata[s.index()].id.clone(),
                period:  p.0,
                value,
            })
            .collect();
        yields.sort_by(|a, b| (&a.stratum, a.period).cmp(&(&b.stratum, b.period)));
        ProblemDocument {
            strata: self.strata.clone(),
            yields,
            demand: self.demand.clone(),
            prices: self.prices.clone(),
            costs:  self.costs.clone(),
        }
    }
}

// ── Serializable document ─────────────────────────────────────────────────────

/// One `(stratum, period) → yield` entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YieldRow {
    #[serde(alias = "id", alias = "stratum_id")]
    pub stratum: String,
    pub period:  u32,
    #[serde(rename = "yield", alias = "yield_m3_per_ha", alias = "m3_per_ha")]
    pub value:   f64,
}

/// The on-disk (`problem.json`) form of [`ProblemData`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemDocument {
    pub strata: Vec<Stratum>,
    pub yields: Vec<YieldRow>,
    pub demand: Vec<PeriodDemand>,
    pub prices: BTreeMap<String, f64>,
    pub costs:  BTreeMap<String, f64>,
}

impl ProblemDocument {
    pub fn into_builder(self) -> ProblemDataBuilder {
        let mut b = ProblemDataBuilder::default();
        for s in self.strata {
            b.add_stratum(s);
        }
        for y in self.yields {
            b.set_yield(y.stratum, Period(y.period), y.value);
        }
        for d in self.demand {
            b.add_demand(d);
        }
        for (species, price) in self.prices {
            b.set_price(species, price);
        }
        for (name, value) in self.costs {
            b.set_cost(name, value);
        }
        b
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Collects raw rows and validates them into a [`ProblemData`].
///
/// Rows are accepted in any order; nothing is checked until
/// [`build`][Self::build], so loaders can stream tables independently.
#[derive(Default)]
pub struct ProblemDataBuilder {
    strata: Vec<Stratum>,
    yields: Vec<(String, Period, f64)>,
    demand: Vec<PeriodDemand>,
    prices: BTreeMap<String, f64>,
    costs:  BTreeMap<String, f64>,
}

impl ProblemDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stratum(&mut self, stratum: Stratum) -> &mut Self {
        self.strata.push(stratum);
        self
    }

    /// Set the yield of stratum `id` in absolute period `period`.  A later
    /// call for the same key overwrites the earlier value.
    pub fn set_yield(&mut self, id: impl Into<String>, period: Period, value: f64) -> &mut Self {
        self.yields.push((id.into(), period, value));
        self
    }

    /// Set the same yield for every period in `periods`.
    pub fn set_constant_yield(
        &mut self,
        id:      &str,
        periods: std::ops::Range<u32>,
        value:   f64,
    ) -> &mut Self {
        for p in periods {
            self.yields.push((id.to_string(), Period(p), value));
        }
        self
    }

    pub fn add_demand(&mut self, demand: PeriodDemand) -> &mut Self {
        self.demand.push(demand);
        self
    }

    pub fn set_price(&mut self, species: impl Into<String>, price: f64) -> &mut Self {
        self.prices.insert(species.into(), price);
        self
    }

    pub fn set_cost(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.costs.insert(name.into(), value);
        self
    }

    /// Validate every table and produce the immutable dataset.
    pub fn build(self) -> DataResult<ProblemData> {
        // ── Strata ────────────────────────────────────────────────────────
        let mut index = HashMap::with_capacity(self.strata.len());
        for (i, s) in self.strata.iter().enumerate() {
            if s.id.trim().is_empty() {
                return Err(DataError::invalid("stratum id", format!("row {i} has an empty id")));
            }
            if !(s.area.is_finite() && s.area >= 0.0) {
                return Err(DataError::invalid(
                    format!("area of stratum {:?}", s.id),
                    format!("{} is not a non-negative number", s.area),
                ));
            }
            let idx = StratumIdx::try_from(i)
                .map_err(|_| DataError::invalid("stratum count", "exceeds u32::MAX"))?;
            if index.insert(s.id.clone(), idx).is_some() {
                return Err(DataError::DuplicateStratum(s.id.clone()));
            }
        }

        // ── Yields ────────────────────────────────────────────────────────
        let mut yields = YieldMap::default();
        for (id, period, value) in self.yields {
            let Some(&idx) = index.get(&id) else {
                return Err(DataError::UnknownStratum { id, table: "yields" });
            };
            if !(value.is_finite() && value >= 0.0) {
                return Err(DataError::invalid(
                    format!("yield of stratum {id:?} in period {}", period.0),
                    format!("{value} is not a non-negative number"),
                ));
            }
            yields.insert((idx, period), value);
        }

        // ── Demand ────────────────────────────────────────────────────────
        let mut bounds: BTreeMap<u32, DemandBounds> = BTreeMap::new();
        for d in &self.demand {
            if !(d.min_vol.is_finite() && d.max_vol.is_finite()) || d.min_vol > d.max_vol || d.min_vol < 0.0 {
                return Err(DataError::invalid(
                    format!("demand for period {} ({})", d.period, d.species),
                    format!("need 0 <= min_vol <= max_vol, got [{}, {}]", d.min_vol, d.max_vol),
                ));
            }
            let b = bounds.entry(d.period).or_insert(DemandBounds { min: 0.0, max: 0.0 });
            b.min += d.min_vol;
            b.max += d.max_vol;
        }

        // ── Prices / costs ────────────────────────────────────────────────
        for (k, v) in self.prices.iter().chain(self.costs.iter()) {
            if !v.is_finite() {
                return Err(DataError::invalid(format!("price/cost {k:?}"), "must be finite"));
            }
        }

        let data = ProblemData {
            strata: self.strata,
            index,
            yields,
            demand: self.demand,
            bounds,
            prices: self.prices,
            costs:  self.costs,
        };
        for &p in data.bounds.keys() {
            let uncovered = data.demand_uncovered_species(Period(p));
            if !uncovered.is_empty() {
                debug!(period = p, ?uncovered, "demand bound also caps species it does not name");
            }
        }
        Ok(data)
    }
}
