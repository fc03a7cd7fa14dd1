//! Problem data loaders.
//!
//! # Directory layout
//!
//! `load_problem_data` looks in one directory and picks the first source
//! present:
//!
//! 1. `problem.json` — a serialized [`ProblemDocument`].
//! 2. `strata.csv` — the CSV table set below.
//! 3. nothing — the deterministic dataset from [`synthesize`].
//!
//! | File               | Columns                                   | Required |
//! |--------------------|-------------------------------------------|----------|
//! | `strata.csv`       | `id,species,area,age`                     | yes      |
//! | `yields.csv`       | `stratum,period,yield`                    | one of   |
//! | `yield_curves.csv` | `stratum,age_bin,yield`                   | these    |
//! | `demand.csv`       | `period,species,min_vol,max_vol`          | no       |
//! | `prices.csv`       | `species,price`                           | no       |
//! | `costs.csv`        | `name,value`                              | no       |
//!
//! Yield columns also accept `stratum_id`/`id` and `yield_m3_per_ha`/`m3_per_ha`.
//! Without `prices.csv` the price table is `PINE = 100`; without `costs.csv`
//! the cost table is `harvest = 50`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    DataError, DataResult, ExpansionParams, PeriodDemand, ProblemData, ProblemDataBuilder,
    ProblemDocument, Stratum, YieldCurve, YieldRow, expand_curves, synthesize,
};
use rh_core::Period;

pub const DEFAULT_PRICE: (&str, f64) = ("PINE", 100.0);
pub const DEFAULT_HARVEST_COST: (&str, f64) = ("harvest", 50.0);

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CurveRecord {
    #[serde(alias = "stratum_id", alias = "id")]
    stratum: String,
    age_bin: u32,
    #[serde(rename = "yield", alias = "yield_per_area", alias = "yield_m3_per_ha")]
    value:   f64,
}

#[derive(Deserialize)]
struct PriceRecord {
    species: String,
    price:   f64,
}

#[derive(Deserialize)]
struct CostRecord {
    name:  String,
    value: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load from `dir`, falling back from JSON to CSV to synthesized data.
pub fn load_problem_data(dir: &Path, expansion: &ExpansionParams) -> DataResult<ProblemData> {
    let json = dir.join("problem.json");
    if json.is_file() {
        return load_json(&json);
    }
    if dir.join("strata.csv").is_file() {
        return load_csv_dir(dir, expansion);
    }
    info!(dir = %dir.display(), "no problem.json or strata.csv; using synthesized dataset");
    synthesize()
}

/// Load a `problem.json` document.
pub fn load_json(path: &Path) -> DataResult<ProblemData> {
    let file = File::open(path)?;
    let doc: ProblemDocument = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| DataError::Parse(format!("{}: {e}", path.display())))?;
    let data = doc.into_builder().build()?;
    log_summary("json", &data);
    Ok(data)
}

/// Load the CSV table set in `dir`.
///
/// `expansion` is only consulted when yields come from `yield_curves.csv`.
pub fn load_csv_dir(dir: &Path, expansion: &ExpansionParams) -> DataResult<ProblemData> {
    let mut b = ProblemDataBuilder::new();

    let strata: Vec<Stratum> = read_csv(&dir.join("strata.csv"))?;
    for s in &strata {
        b.add_stratum(s.clone());
    }

    let yields_path = dir.join("yields.csv");
    let curves_path = dir.join("yield_curves.csv");
    if yields_path.is_file() {
        for row in read_csv::<YieldRow>(&yields_path)? {
            b.set_yield(row.stratum, Period(row.period), row.value);
        }
    } else if curves_path.is_file() {
        let mut curves: Vec<YieldCurve> = Vec::new();
        for r in read_csv::<CurveRecord>(&curves_path)? {
            match curves.iter_mut().find(|c| c.stratum_id == r.stratum) {
                Some(c) => c.bins.push((r.age_bin, r.value)),
                None => curves.push(YieldCurve { stratum_id: r.stratum, bins: vec![(r.age_bin, r.value)] }),
            }
        }
        let curves: Vec<YieldCurve> =
            curves.into_iter().map(|c| YieldCurve::new(c.stratum_id, c.bins)).collect();
        expand_curves(&strata, &curves, expansion, &mut b)?;
    } else {
        return Err(DataError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("neither yields.csv nor yield_curves.csv in {}", dir.display()),
        )));
    }

    let demand_path = dir.join("demand.csv");
    if demand_path.is_file() {
        for d in read_csv::<PeriodDemand>(&demand_path)? {
            b.add_demand(d);
        }
    }

    let prices_path = dir.join("prices.csv");
    if prices_path.is_file() {
        for r in read_csv::<PriceRecord>(&prices_path)? {
            b.set_price(r.species, r.price);
        }
    } else {
        b.set_price(DEFAULT_PRICE.0, DEFAULT_PRICE.1);
    }

    let costs_path = dir.join("costs.csv");
    if costs_path.is_file() {
        for r in read_csv::<CostRecord>(&costs_path)? {
            b.set_cost(r.name, r.value);
        }
    } else {
        b.set_cost(DEFAULT_HARVEST_COST.0, DEFAULT_HARVEST_COST.1);
    }

    let data = b.build()?;
    log_summary("csv", &data);
    Ok(data)
}

/// Deserialize every row of one CSV source.
pub fn read_csv_reader<T: DeserializeOwned, R: Read>(reader: R) -> DataResult<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = rdr
        .deserialize::<T>()
        .map(|r| r.map_err(|e| DataError::Parse(e.to_string())))
        .collect();
    rows
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_csv<T: DeserializeOwned>(path: &Path) -> DataResult<Vec<T>> {
    let file = File::open(path)?;
    read_csv_reader(file).map_err(|e| match e {
        DataError::Parse(msg) => DataError::Parse(format!("{}: {msg}", path.display())),
        other => other,
    })
}

fn log_summary(source: &str, data: &ProblemData) {
    let (first, last) = data
        .yield_period_range()
        .map(|(a, b)| (a.0 as i64, b.0 as i64))
        .unwrap_or((-1, -1));
    info!(
        source,
        strata = data.stratum_count(),
        yields = data.yield_count(),
        first_period = first,
        last_period = last,
        demand_rows = data.demand().len(),
        "loaded problem data"
    );
}
