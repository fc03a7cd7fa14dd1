//! `rhsim run-sim` / `rhsim solve-bilevel`.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{error, info};

use rh_core::RunConfig;
use rh_data::{ExpansionParams, load_problem_data};
use rh_output::{CsvWriter, MultiWriter, RunManifest, SimOutputObserver};
use rh_sim::{Plugins, RunOutcome, SimBuilder};

/// What a finished run left behind.
#[derive(Debug)]
pub struct RunReport {
    pub out_dir:  PathBuf,
    pub periods:  usize,
    pub manifest: PathBuf,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} periods, outputs in {}", self.periods, self.out_dir.display())
    }
}

/// Every writer enabled in this build, all pointed at `dir`.
fn open_writers(dir: &Path) -> Result<MultiWriter> {
    let mut writers = MultiWriter::new();
    writers.push(Box::new(CsvWriter::new(dir)?));
    #[cfg(feature = "sqlite")]
    writers.push(Box::new(rh_output::SqliteWriter::new(dir)?));
    #[cfg(feature = "parquet")]
    writers.push(Box::new(rh_output::ParquetWriter::new(dir)?));
    Ok(writers)
}

/// Load the data, run to `end_period`, and write outputs plus the manifest.
///
/// A fatal period is returned as an error, but only after the manifest has
/// recorded it.
pub fn run(config: RunConfig) -> Result<RunReport> {
    let expansion = ExpansionParams::from_horizon(&config.horizon);
    let data_dir = PathBuf::from(&config.data_path);
    let data = load_problem_data(&data_dir, &expansion)
        .with_context(|| format!("loading problem data from {}", data_dir.display()))?;

    let out_dir = PathBuf::from(&config.run.out_dir);
    let plugins = Plugins::builtin();
    let mut sim = SimBuilder::new(config, data).plugins(&plugins).build()?;

    let mut obs = SimOutputObserver::new(open_writers(&out_dir)?);
    let result = sim.run(&mut obs);

    let outcome = match (&result, obs.outcome()) {
        (_, Some(outcome)) => outcome.clone(),
        (Ok(()), None) => RunOutcome::Completed { periods: sim.records().len() },
        (Err(e), None) => RunOutcome::Aborted { period: e.period(), reason: e.to_string() },
    };
    let manifest = RunManifest::from_simulator(&sim, outcome).write(&out_dir)?;

    if let Err(e) = result {
        error!(error = %e, manifest = %manifest.display(), "run aborted");
        return Err(anyhow!(e).context(format!("run aborted; see {}", manifest.display())));
    }
    if let Some(e) = obs.take_error() {
        return Err(anyhow!(e).context(format!("writing outputs to {}", out_dir.display())));
    }

    info!(periods = sim.records().len(), out_dir = %out_dir.display(), "outputs written");
    Ok(RunReport { out_dir, periods: sim.records().len(), manifest })
}
