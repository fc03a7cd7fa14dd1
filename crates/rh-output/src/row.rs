//! Flat row types written by output backends.

use rh_sim::PeriodRecord;

/// One period's summary, flattened from a [`PeriodRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRow {
    pub period:           u32,
    pub window_start:     u32,
    pub window_end:       u32,
    pub objective:        f64,
    pub committed_volume: f64,
    pub committed_area:   f64,
    /// `feasible`, `partial` or `infeasible`.
    pub agent_status:     &'static str,
    pub realized_flow:    f64,
    pub agent_cost:       f64,
    pub degraded:         bool,
    pub remaining_area:   f64,
    pub backlog:          f64,
    /// Empty when the agent left no note.
    pub note:             String,
}

impl From<&PeriodRecord> for PeriodRow {
    fn from(r: &PeriodRecord) -> Self {
        Self {
            period:           r.period.0,
            window_start:     r.window_start.0,
            window_end:       r.window_end.0,
            objective:        r.objective,
            committed_volume: r.committed_volume,
            committed_area:   r.committed_area,
            agent_status:     r.agent_status.as_str(),
            realized_flow:    r.realized_flow,
            agent_cost:       r.agent_cost,
            degraded:         r.degraded,
            remaining_area:   r.remaining_area,
            backlog:          r.backlog,
            note:             r.note.clone().unwrap_or_default(),
        }
    }
}

/// One committed `(stratum, product)` volume.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitmentRow {
    pub period:  u32,
    pub stratum: String,
    pub product: String,
    pub volume:  f64,
}

impl CommitmentRow {
    /// All commitment entries of `record`, in key order.
    pub fn from_record(record: &PeriodRecord) -> Vec<CommitmentRow> {
        record
            .commitments
            .iter()
            .map(|e| CommitmentRow {
                period:  record.period.0,
                stratum: e.stratum.clone(),
                product: e.product.clone(),
                volume:  e.volume,
            })
            .collect()
    }
}
