//! Simulation observer trait for progress reporting and data collection.

use rh_core::{Period, RunConfig, Window};
use rh_data::ProblemData;

use crate::{PeriodRecord, RunOutcome};

/// Callbacks invoked by [`RollingHorizonSimulator::run`][crate::RollingHorizonSimulator::run]
/// at key points of the period loop.
///
/// All methods default to no-ops.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_period_end(&mut self, record: &PeriodRecord) {
///         println!("{}: committed {:.1}", record.period, record.committed_volume);
///     }
/// }
/// ```
pub trait SimObserver {
    fn on_run_start(&mut self, _config: &RunConfig, _data: &ProblemData) {}

    /// Called before the window for `period` is solved.
    fn on_period_start(&mut self, _period: Period, _window: Window) {}

    /// Called once per completed period, degraded or not.
    fn on_period_end(&mut self, _record: &PeriodRecord) {}

    /// Called after `on_period_end` when the agent reported infeasible.
    fn on_degraded(&mut self, _record: &PeriodRecord) {}

    /// Called once when the run stops, including when it aborts.
    fn on_run_end(&mut self, _outcome: &RunOutcome) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
