//! Per-period output records.

use std::fmt;

use serde::Serialize;

use rh_agent::ResponseStatus;
use rh_core::{CommitmentEntry, Period};

/// Everything that happened in one simulated period.
///
/// Contains no timing data, so identical inputs give identical records.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PeriodRecord {
    pub period:           Period,
    pub window_start:     Period,
    pub window_end:       Period,
    pub objective:        f64,
    pub committed_volume: f64,
    /// Area consumed this period across all strata.
    pub committed_area:   f64,
    pub commitments:      Vec<CommitmentEntry>,
    pub agent_status:     ResponseStatus,
    pub realized_flow:    f64,
    pub agent_cost:       f64,
    /// `true` when the agent could not honour the commitment.
    pub degraded:         bool,
    /// Total remaining area after this period.
    pub remaining_area:   f64,
    /// Cumulative backlog after this period.
    pub backlog:          f64,
    pub note:             Option<String>,
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed { periods: usize },
    Aborted { period: Option<Period>, reason: String },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed { periods } => write!(f, "completed after {periods} periods"),
            RunOutcome::Aborted { period: Some(p), reason } => write!(f, "aborted at period {}: {reason}", p.0),
            RunOutcome::Aborted { period: None, reason } => write!(f, "aborted: {reason}"),
        }
    }
}
