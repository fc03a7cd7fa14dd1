//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tracing::warn;

use rh_sim::{PeriodRecord, RunOutcome, SimObserver};

use crate::row::{CommitmentRow, PeriodRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every period record and its commitments to
/// any [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    periods:    usize,
    outcome:    Option<RunOutcome>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, periods: 0, outcome: None, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Number of period rows handed to the writer.
    pub fn periods_written(&self) -> usize {
        self.periods
    }

    /// How the observed run ended; `None` until `on_run_end`.
    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_period_end(&mut self, record: &PeriodRecord) {
        let result = self
            .writer
            .write_period(&PeriodRow::from(record))
            .and_then(|()| self.writer.write_commitments(&CommitmentRow::from_record(record)));
        if result.is_ok() {
            self.periods += 1;
        }
        self.store_err(result);
    }

    fn on_run_end(&mut self, outcome: &RunOutcome) {
        self.outcome = Some(outcome.clone());
        let result = self.writer.finish();
        self.store_err(result);
    }
}
