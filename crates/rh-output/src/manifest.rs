//! Run provenance written next to the outputs.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use rh_core::RunConfig;
use rh_sim::{RollingHorizonSimulator, RunOutcome};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Everything needed to tell where a run's outputs came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunManifest {
    /// Version of the crate that produced the run.
    pub version: String,
    pub config:  RunConfig,
    pub seed:    u64,
    pub solver:  String,
    pub policy:  String,
    pub reactor: String,
    /// Periods completed before the run stopped.
    pub periods: usize,
    pub outcome: RunOutcome,
}

impl RunManifest {
    /// Describe `sim` as it stands after `run` returned with `outcome`.
    pub fn from_simulator(sim: &RollingHorizonSimulator, outcome: RunOutcome) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config:  sim.config().clone(),
            seed:    sim.config().run.random_seed,
            solver:  sim.solver_name().to_string(),
            policy:  sim.policy_name().to_string(),
            reactor: sim.reactor_name().to_string(),
            periods: sim.records().len(),
            outcome,
        }
    }

    /// Write `manifest.json` into `dir`, creating it if needed.
    pub fn write(&self, dir: &Path) -> crate::OutputResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(MANIFEST_FILE);
        let file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(file, self)?;
        info!(path = %path.display(), outcome = %self.outcome, "run manifest written");
        Ok(path)
    }
}
