//! Mutable per-run state.

use rh_core::{Commitment, Period};
use rh_data::ProblemData;

/// Everything the loop carries from one period to the next.
///
/// Owned by the simulator and mutated only by [`apply`][Self::apply] and
/// [`advance`][Self::advance], once per period, after the agent reacts.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    period:           Period,
    initial_area:     Vec<f64>,
    remaining_area:   Vec<f64>,
    /// Cumulative area consumed per stratum.
    committed_area:   Vec<f64>,
    delivered_volume: f64,
    /// Cumulative `committed − realized` volume.
    backlog:          f64,
}

impl SimulationState {
    pub fn new(data: &ProblemData, start: Period) -> Self {
        let initial_area: Vec<f64> = data.strata().iter().map(|s| s.area).collect();
        Self {
            period:           start,
            remaining_area:   initial_area.clone(),
            committed_area:   vec![0.0; initial_area.len()],
            initial_area,
            delivered_volume: 0.0,
            backlog:          0.0,
        }
    }

    #[inline]
    pub fn period(&self) -> Period {
        self.period
    }

    pub fn initial_area(&self) -> &[f64] {
        &self.initial_area
    }

    pub fn remaining_area(&self) -> &[f64] {
        &self.remaining_area
    }

    pub fn committed_area(&self) -> &[f64] {
        &self.committed_area
    }

    pub fn total_remaining_area(&self) -> f64 {
        self.remaining_area.iter().sum()
    }

    pub fn delivered_volume(&self) -> f64 {
        self.delivered_volume
    }

    pub fn backlog(&self) -> f64 {
        self.backlog
    }

    /// Consume the commitment's area and book the agent's realized flow.
    ///
    /// Each stratum's take is capped at its remaining area.  Returns the
    /// total area consumed.
    pub(crate) fn apply(&mut self, commitment: &Commitment, realized_flow: f64) -> f64 {
        let mut consumed = 0.0;
        for (&s, &area) in &commitment.areas {
            let i = s.index();
            let take = area.min(self.remaining_area[i]).max(0.0);
            self.remaining_area[i] -= take;
            self.committed_area[i] += take;
            consumed += take;
        }
        self.delivered_volume += realized_flow;
        self.backlog += commitment.total_volume() - realized_flow;
        consumed
    }

    /// Move to the next decision period.  Saturates at `u32::MAX`, which is
    /// never below `end_period`, so an overflowing step ends the run.
    pub(crate) fn advance(&mut self, step: u32) {
        self.period = Period(self.period.0.saturating_add(step));
    }
}
