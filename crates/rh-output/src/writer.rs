//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CommitmentRow, OutputResult, PeriodRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Errors surface through [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error]
/// when the writer is driven by the observer.
pub trait OutputWriter {
    /// Write one period summary row.
    fn write_period(&mut self, row: &PeriodRow) -> OutputResult<()>;

    /// Write the commitment entries of one period.
    fn write_commitments(&mut self, rows: &[CommitmentRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: OutputWriter + ?Sized> OutputWriter for Box<W> {
    fn write_period(&mut self, row: &PeriodRow) -> OutputResult<()> {
        (**self).write_period(row)
    }

    fn write_commitments(&mut self, rows: &[CommitmentRow]) -> OutputResult<()> {
        (**self).write_commitments(rows)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}

/// Forwards every call to several writers in order.
///
/// Stops at the first failing writer for a given call; `finish` still
/// reaches every writer and reports the first error.
#[derive(Default)]
pub struct MultiWriter {
    writers: Vec<Box<dyn OutputWriter>>,
}

impl MultiWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, writer: Box<dyn OutputWriter>) -> &mut Self {
        self.writers.push(writer);
        self
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl OutputWriter for MultiWriter {
    fn write_period(&mut self, row: &PeriodRow) -> OutputResult<()> {
        for w in &mut self.writers {
            w.write_period(row)?;
        }
        Ok(())
    }

    fn write_commitments(&mut self, rows: &[CommitmentRow]) -> OutputResult<()> {
        for w in &mut self.writers {
            w.write_commitments(rows)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        let mut first = Ok(());
        for w in &mut self.writers {
            let result = w.finish();
            if first.is_ok() {
                first = result;
            }
        }
        first
    }
}
