//! `rh-sim` — the rolling-horizon loop.
//!
//! # One period
//!
//! ```text
//! while t < end_period:
//!   ① Window   — [t, t + H - 1], clipped before end_period.
//!   ② Solve    — AllocationModel over the window against remaining area.
//!                Infeasible / unbounded / over time limit → run aborts at t.
//!   ③ Extract  — Commitment for period t only (aggregate fallback).
//!                With bilevel enabled, the BilevelHook may refine it.
//!   ④ React    — AgentReactor answers an AgentRequest built from it.
//!                Infeasible answer → degraded record, realized flow 0.
//!   ⑤ Apply    — remaining area −= committed area; backlog, deliveries.
//!   ⑥ Advance  — t += replanning_step.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | [`run_scenarios`] runs configurations on Rayon's thread pool. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rh_core::RunConfig;
//! use rh_sim::{NoopObserver, Plugins, SimBuilder};
//!
//! let plugins = Plugins::builtin();
//! let mut sim = SimBuilder::new(config, data).plugins(&plugins).build()?;
//! sim.run(&mut NoopObserver)?;
//! for record in sim.records() {
//!     println!("{}: {}", record.period, record.committed_volume);
//! }
//! ```

pub mod bilevel;
pub mod builder;
pub mod error;
pub mod observer;
pub mod plugins;
pub mod record;
pub mod scenario;
pub mod sim;
pub mod state;


pub use bilevel::{BilevelHook, DecompositionStub};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use plugins::Plugins;
pub use record::{PeriodRecord, RunOutcome};
pub use scenario::run_scenarios;
pub use sim::{RollingHorizonSimulator, run_simulation};
pub use state::SimulationState;
