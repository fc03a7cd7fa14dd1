//! `rh-output` — run output writers for the rolling-horizon simulator.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                |
//! |-----------|-------------|----------------------------------------------|
//! | *(none)*  | CSV         | `periods.csv`, `commitments.csv`             |
//! | `sqlite`  | SQLite      | `output.db`                                  |
//! | `parquet` | Parquet     | `periods.parquet`, `commitments.parquet`     |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `rh_sim::SimObserver`.
//! [`RunManifest`] records the provenance of a run in `manifest.json`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rh_output::{CsvWriter, RunManifest, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./runs/default"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! let result = sim.run(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! RunManifest::from_run(&sim, obs.outcome()).write(Path::new("./runs/default"))?;
//! ```

pub mod csv;
pub mod error;
pub mod manifest;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use manifest::{MANIFEST_FILE, RunManifest};
pub use observer::SimOutputObserver;
pub use row::{CommitmentRow, PeriodRow};
pub use writer::{MultiWriter, OutputWriter};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
