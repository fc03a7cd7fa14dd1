//! Request/response payloads at the principal/agent boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use rh_core::{Commitment, CommitmentEntry, Period};

/// One committed `(stratum, product)` entry offered to the agent, with the
/// committed volume as the upper bound on what it may take.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupplyBlock {
    pub stratum: String,
    pub product: String,
    pub ub_vol:  f64,
}

/// What the principal asks of the agent for one period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub period:      Period,
    pub commitments: Vec<CommitmentEntry>,
    pub blocks:      Vec<SupplyBlock>,
}

impl AgentRequest {
    pub fn from_commitment(commitment: &Commitment) -> Self {
        let commitments = commitment.entries();
        let blocks = commitments
            .iter()
            .map(|e| SupplyBlock {
                stratum: e.stratum.clone(),
                product: e.product.clone(),
                ub_vol:  e.volume,
            })
            .collect();
        Self { period: commitment.period, commitments, blocks }
    }

    /// Sum of committed volumes.
    pub fn committed_volume(&self) -> f64 {
        self.commitments.iter().map(|e| e.volume).sum()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Feasible,
    Partial,
    Infeasible,
}

impl ResponseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseStatus::Feasible   => "feasible",
            ResponseStatus::Partial    => "partial",
            ResponseStatus::Infeasible => "infeasible",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The agent's answer for one period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub period:        Period,
    pub status:        ResponseStatus,
    /// Volume actually delivered.  Ignored when `status` is `Infeasible`.
    pub realized_flow: f64,
    /// Advisory cost of delivering `realized_flow`.
    #[serde(default)]
    pub cost:          f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note:          Option<String>,
}

impl AgentResponse {
    pub fn feasible(period: Period, realized_flow: f64, cost: f64) -> Self {
        Self { period, status: ResponseStatus::Feasible, realized_flow, cost, note: None }
    }

    pub fn partial(period: Period, realized_flow: f64, cost: f64) -> Self {
        Self { period, status: ResponseStatus::Partial, realized_flow, cost, note: None }
    }

    pub fn infeasible(period: Period, note: impl Into<String>) -> Self {
        Self {
            period,
            status: ResponseStatus::Infeasible,
            realized_flow: 0.0,
            cost: 0.0,
            note: Some(note.into()),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
