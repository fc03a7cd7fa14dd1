//! `rhsim init` — example configs and a small CSV dataset.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use rh_core::{BilevelConfig, Reformulation, RunConfig};

// ── Dataset ───────────────────────────────────────────────────────────────────

const STRATA_CSV: &str = "\
id,species,area,age
S0,PINE,120,45
S1,PINE,80,62
S2,SPRUCE,150,38
S3,SPRUCE,60,71
";

// Age bins are 10 years wide; ages past the last bin keep its yield.
const YIELD_CURVES_CSV: &str = "\
stratum,age_bin,yield
S0,3,1.2
S0,4,1.8
S0,5,2.3
S1,5,2.1
S1,6,2.6
S1,7,2.8
S2,3,1.0
S2,4,1.6
S3,6,2.4
S3,7,2.9
";

const DEMAND_CSV: &str = "\
period,species,min_vol,max_vol
0,PINE,0,300
0,SPRUCE,0,300
6,PINE,0,250
12,PINE,0,250
";

const PRICES_CSV: &str = "\
species,price
PINE,100
SPRUCE,90
";

const COSTS_CSV: &str = "\
name,value
harvest,50
";

const DATA_FILES: [(&str, &str); 5] = [
    ("strata.csv", STRATA_CSV),
    ("yield_curves.csv", YIELD_CURVES_CSV),
    ("demand.csv", DEMAND_CSV),
    ("prices.csv", PRICES_CSV),
    ("costs.csv", COSTS_CSV),
];

// ── Configs ───────────────────────────────────────────────────────────────────

/// The `configs/minimal.toml` contents for a project rooted at `target`.
pub fn minimal_config(target: &Path) -> RunConfig {
    let mut config = RunConfig::default();
    // Resolved against the config file's directory.
    config.data_path = "../data".into();
    config.horizon.end_period = 24;
    config.principal_policy.name = "even_flow".into();
    config.agent_behavior.name = "profit_max_flow_stub".into();
    config.solver.time_limit = Some(30.0);
    config.run.out_dir = target.join("runs").join("minimal").to_string_lossy().into_owned();
    config
}

/// `minimal_config` with the bilevel decomposition hook enabled.
pub fn bilevel_config(target: &Path) -> RunConfig {
    let mut config = minimal_config(target);
    config.bilevel = BilevelConfig { enabled: true, reformulation: Reformulation::Decomposition };
    config.run.out_dir = target.join("runs").join("bilevel_stub").to_string_lossy().into_owned();
    config
}

/// Write the configs and dataset under `target`; returns the written paths.
///
/// Existing files are only replaced with `force`.
pub fn write_project(target: &Path, force: bool) -> Result<Vec<PathBuf>> {
    let configs = target.join("configs");
    let data = target.join("data");

    let mut files: Vec<(PathBuf, String)> = vec![
        (configs.join("minimal.toml"), minimal_config(target).to_toml_string()?),
        (configs.join("bilevel_stub.toml"), bilevel_config(target).to_toml_string()?),
    ];
    files.extend(DATA_FILES.iter().map(|(name, text)| (data.join(name), text.to_string())));

    if !force {
        if let Some((path, _)) = files.iter().find(|(p, _)| p.exists()) {
            bail!("{} already exists; pass --force to overwrite", path.display());
        }
    }

    fs::create_dir_all(&configs).with_context(|| format!("creating {}", configs.display()))?;
    fs::create_dir_all(&data).with_context(|| format!("creating {}", data.display()))?;
    let mut written = Vec::with_capacity(files.len());
    for (path, text) in files {
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
