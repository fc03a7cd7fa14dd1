//! Independent scenario sweeps.
//!
//! Each configuration gets its own clone of the problem data and a fresh
//! simulator, so runs share nothing mutable.  With the `parallel` feature
//! they are spread over Rayon's thread pool; otherwise they run one after
//! another.  Either way the results come back in input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use rh_core::RunConfig;
use rh_data::ProblemData;

use crate::{PeriodRecord, Plugins, SimResult, run_simulation};

/// Run every configuration in `configs` against its own copy of `data`.
///
/// A failing scenario does not affect the others; its slot holds the error.
pub fn run_scenarios(
    data:    &ProblemData,
    configs: &[RunConfig],
    plugins: &Plugins,
) -> Vec<SimResult<Vec<PeriodRecord>>> {
    info!(scenarios = configs.len(), parallel = cfg!(feature = "parallel"), "scenario sweep started");

    #[cfg(feature = "parallel")]
    let results: Vec<_> = configs
        .par_iter()
        .map(|config| run_simulation(data.clone(), config, plugins))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = configs
        .iter()
        .map(|config| run_simulation(data.clone(), config, plugins))
        .collect();

    results
}
