//! Small deterministic dataset used when no input files are present.

use rh_core::Period;

use crate::{DataResult, PeriodDemand, ProblemData, ProblemDataBuilder, Stratum};

pub const SYNTH_STRATA: u32 = 5;
pub const SYNTH_PERIODS: u32 = 52;

/// Five PINE strata `S0..S4` with constant yields over periods `0..52` and
/// open demand bounds.
///
/// Stratum `i` has area `100 + 10i`, age `60 + 3i`, and yield
/// `2.0 + (i % 3) * 0.1` in every period.
pub fn synthesize() -> DataResult<ProblemData> {
    let mut b = ProblemDataBuilder::new();
    for i in 0..SYNTH_STRATA {
        let id = format!("S{i}");
        b.add_stratum(Stratum::new(id.clone(), 100.0 + 10.0 * i as f64).with_age(60 + 3 * i));
        b.set_constant_yield(&id, 0..SYNTH_PERIODS, 2.0 + (i % 3) as f64 * 0.1);
    }
    for t in 0..SYNTH_PERIODS {
        b.add_demand(PeriodDemand::new(Period(t), 0.0, 1e6));
    }
    b.set_price("PINE", 100.0);
    b.set_cost("harvest", 50.0);
    b.build()
}
