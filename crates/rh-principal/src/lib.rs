//! `rh-principal` — the upper level of the rolling-horizon loop.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`params`]   | `PolicyParams` — typed view of `principal_policy.params`          |
//! | [`model`]    | `WindowModelBuilder`, `AllocationModel`, `WindowSolution`         |
//! | [`policy`]   | `PrincipalPolicy` trait, built-in objectives, `PolicyRegistry`    |
//! | [`extract`]  | `CommitmentExtractor` — first-period slice with aggregate fallback |
//! | [`error`]    | `PrincipalError`, `PrincipalResult<T>`                            |
//!
//! # Design notes
//!
//! The constraint set of a window is fixed: area conservation per stratum,
//! a physical volume cap per period, optional demand bounds, and an optional
//! minimum flow on the first period only.  [`WindowModelBuilder::new`] adds
//! all of it before a policy sees the builder, so a policy can only shape the
//! objective (adding auxiliary columns and rows for linearisation if it needs
//! them).

pub mod error;
pub mod extract;
pub mod model;
pub mod params;
pub mod policy;


pub use error::{PrincipalError, PrincipalResult};
pub use extract::{CommitmentExtractor, DEFAULT_EPSILON};
pub use model::{AllocationModel, WindowModelBuilder, WindowSolution, first_conflict_period};
pub use params::PolicyParams;
pub use policy::{EvenFlow, MaxVolume, PolicyFactory, PolicyRegistry, PrincipalPolicy, Revenue};
