//! `rh-core` — foundational types for the rolling-horizon allocation simulator.
//!
//! This crate is a dependency of every other `rh-*` crate.  It has no `rh-*`
//! dependencies and only small external ones (`rand`, `serde`, `thiserror`,
//! `toml`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `StratumIdx`                                              |
//! | [`period`]      | `Period`, `Window`                                        |
//! | [`commitment`]  | `Commitment`, `CommitmentKey`, `CommitmentEntry`          |
//! | [`config`]      | `RunConfig` and its sections, validation                  |
//! | [`rng`]         | `SimRng` (seeded per run / per period)                    |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |

pub mod commitment;
pub mod config;
pub mod error;
pub mod ids;
pub mod period;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use commitment::{AGGREGATE_STRATUM, Commitment, CommitmentEntry, CommitmentKey, DEFAULT_PRODUCT};
pub use config::{
    AgentBehaviorConfig, BilevelConfig, HorizonConfig, LogLevel, Params, PrincipalPolicyConfig,
    Reformulation, RunConfig, RunSection, SolverConfig, SolverDriver,
};
pub use error::{CoreError, CoreResult};
pub use ids::StratumIdx;
pub use period::{Period, Window};
pub use rng::SimRng;
