//! Built-in reactors.
//!
//! | Name                   | Parameters                        | Behavior                                   |
//! |------------------------|-----------------------------------|--------------------------------------------|
//! | `accept_all`           | —                                 | delivers every commitment at zero cost     |
//! | `profit_max_flow_stub` | `unit_cost`                       | delivers blocks whose price beats the cost |
//! | `capacity_limited`     | `capacity`, `unit_cost`           | delivers up to a fixed volume per period   |
//! | `random_shortfall`     | `shortfall_prob`, `max_shortfall` | randomly delivers only part of the volume  |

use tracing::debug;

use rh_core::{Params, SimRng};

use crate::reactor::{fraction, non_negative};
use crate::{AgentReactor, AgentRequest, AgentResponse, ReactorContext, ReactorResult};

/// Volumes at or below this count as nothing delivered.
const FLOW_EPS: f64 = 1e-9;

// ── AcceptAll ─────────────────────────────────────────────────────────────────

/// Always feasible: realized flow equals the committed volume.
pub struct AcceptAll;

impl AgentReactor for AcceptAll {
    fn name(&self) -> &str {
        "accept_all"
    }

    fn react(
        &self,
        request: &AgentRequest,
        _ctx:    &ReactorContext<'_>,
        _rng:    &mut SimRng,
    ) -> ReactorResult<AgentResponse> {
        Ok(AgentResponse::feasible(request.period, request.committed_volume(), 0.0))
    }
}

// ── ProfitMaxFlowStub ─────────────────────────────────────────────────────────

/// A profit-maximizing operator without a network model: it takes every
/// block whose price exceeds its unit cost and leaves the rest.
///
/// `unit_cost` defaults to the dataset's `harvest` cost.
pub struct ProfitMaxFlowStub {
    unit_cost: Option<f64>,
}

impl ProfitMaxFlowStub {
    pub fn new(unit_cost: Option<f64>) -> Self {
        Self { unit_cost }
    }

    pub fn from_params(params: &Params) -> ReactorResult<Self> {
        Ok(Self::new(non_negative(params, "unit_cost")?))
    }
}

impl AgentReactor for ProfitMaxFlowStub {
    fn name(&self) -> &str {
        "profit_max_flow_stub"
    }

    fn react(
        &self,
        request: &AgentRequest,
        ctx:     &ReactorContext<'_>,
        _rng:    &mut SimRng,
    ) -> ReactorResult<AgentResponse> {
        let unit_cost = self
            .unit_cost
            .unwrap_or_else(|| ctx.data.cost("harvest").unwrap_or(0.0));

        let committed = request.committed_volume();
        let mut taken = 0.0;
        for block in &request.blocks {
            if ctx.price_for(&block.stratum) - unit_cost > 0.0 {
                taken += block.ub_vol;
            } else {
                debug!(period = request.period.0, stratum = %block.stratum, "block below cost; declined");
            }
        }

        let response = if committed <= FLOW_EPS || (committed - taken).abs() <= FLOW_EPS {
            AgentResponse::feasible(request.period, taken, unit_cost * taken)
        } else if taken > FLOW_EPS {
            AgentResponse::partial(request.period, taken, unit_cost * taken)
                .with_note("some blocks priced below unit cost")
        } else {
            AgentResponse::infeasible(request.period, "no block covers its unit cost")
        };
        Ok(response)
    }
}

// ── CapacityLimited ───────────────────────────────────────────────────────────

/// Delivers at most `capacity` volume per period.
pub struct CapacityLimited {
    capacity:  f64,
    unit_cost: f64,
}

impl CapacityLimited {
    pub fn new(capacity: f64, unit_cost: f64) -> Self {
        Self { capacity, unit_cost }
    }

    pub fn from_params(params: &Params) -> ReactorResult<Self> {
        Ok(Self::new(
            non_negative(params, "capacity")?.unwrap_or(f64::INFINITY),
            non_negative(params, "unit_cost")?.unwrap_or(0.0),
        ))
    }
}

impl AgentReactor for CapacityLimited {
    fn name(&self) -> &str {
        "capacity_limited"
    }

    fn react(
        &self,
        request: &AgentRequest,
        _ctx:    &ReactorContext<'_>,
        _rng:    &mut SimRng,
    ) -> ReactorResult<AgentResponse> {
        let committed = request.committed_volume();
        let realized = committed.min(self.capacity);
        let cost = self.unit_cost * realized;

        let response = if committed - realized <= FLOW_EPS {
            AgentResponse::feasible(request.period, realized, cost)
        } else if realized > FLOW_EPS {
            AgentResponse::partial(request.period, realized, cost).with_note("capacity reached")
        } else {
            AgentResponse::infeasible(request.period, "no capacity")
        };
        Ok(response)
    }
}

// ── RandomShortfall ───────────────────────────────────────────────────────────

/// With probability `shortfall_prob`, delivers only `1 − f` of the committed
/// volume, where `f` is uniform in `[0, max_shortfall]`.
pub struct RandomShortfall {
    shortfall_prob: f64,
    max_shortfall:  f64,
}

impl RandomShortfall {
    pub fn new(shortfall_prob: f64, max_shortfall: f64) -> Self {
        Self { shortfall_prob, max_shortfall }
    }

    pub fn from_params(params: &Params) -> ReactorResult<Self> {
        Ok(Self::new(
            fraction(params, "shortfall_prob")?.unwrap_or(0.1),
            fraction(params, "max_shortfall")?.unwrap_or(0.5),
        ))
    }
}

impl AgentReactor for RandomShortfall {
    fn name(&self) -> &str {
        "random_shortfall"
    }

    fn react(
        &self,
        request: &AgentRequest,
        _ctx:    &ReactorContext<'_>,
        rng:     &mut SimRng,
    ) -> ReactorResult<AgentResponse> {
        let committed = request.committed_volume();
        // Both draws happen every period, hit or not.
        let hit = rng.gen_bool(self.shortfall_prob);
        let f = rng.gen_range(0.0..=self.max_shortfall);

        if !hit || f <= 0.0 || committed <= FLOW_EPS {
            return Ok(AgentResponse::feasible(request.period, committed, 0.0));
        }
        let realized = committed * (1.0 - f);
        if realized > FLOW_EPS {
            Ok(AgentResponse::partial(request.period, realized, 0.0).with_note(format!("shortfall {:.1}%", f * 100.0)))
        } else {
            Ok(AgentResponse::infeasible(request.period, "total shortfall"))
        }
    }
}
