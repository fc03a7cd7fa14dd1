//! `rh-data` — the immutable per-run dataset consumed by the window model.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`stratum`]  | `Stratum`, `PeriodDemand`, `DemandBounds`                    |
//! | [`problem`]  | `ProblemData`, `ProblemDataBuilder` (validation)             |
//! | [`expand`]   | `YieldCurve`, `ExpansionParams`, `expand_curves`             |
//! | [`loader`]   | `load_problem_data`, `load_csv_dir`, `load_json`             |
//! | [`synth`]    | `synthesize` — small deterministic dataset                   |
//! | [`error`]    | `DataError`, `DataResult<T>`                                 |
//!
//! `ProblemData` is loaded once, validated, and then only read.  All
//! referential checks (unknown strata, duplicate ids, bad numbers) happen in
//! [`ProblemDataBuilder::build`], before any simulation period runs.

pub mod error;
pub mod expand;
pub mod loader;
pub mod problem;
pub mod stratum;
pub mod synth;


pub use error::{DataError, DataResult};
pub use expand::{ExpansionParams, YieldCurve, expand_curves};
pub use loader::{load_csv_dir, load_json, load_problem_data};
pub use problem::{ProblemData, ProblemDataBuilder, ProblemDocument, YieldRow};
pub use stratum::{DemandBounds, PeriodDemand, Stratum};
pub use synth::synthesize;
