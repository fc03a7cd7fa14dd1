//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `periods.csv`
//! - `commitments.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CommitmentRow, OutputResult, PeriodRow};

pub const PERIOD_HEADERS: [&str; 13] = [
    "period",
    "window_start",
    "window_end",
    "objective",
    "committed_volume",
    "committed_area",
    "agent_status",
    "realized_flow",
    "agent_cost",
    "degraded",
    "remaining_area",
    "backlog",
    "note",
];

pub const COMMITMENT_HEADERS: [&str; 4] = ["period", "stratum", "product", "volume"];

/// Writes run output to two CSV files.
pub struct CsvWriter {
    periods:     Writer<File>,
    commitments: Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Create (or truncate) the two CSV files in `dir` and write the header
    /// rows.  `dir` is created if missing.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut periods = Writer::from_path(dir.join("periods.csv"))?;
        periods.write_record(PERIOD_HEADERS)?;

        let mut commitments = Writer::from_path(dir.join("commitments.csv"))?;
        commitments.write_record(COMMITMENT_HEADERS)?;

        Ok(Self { periods, commitments, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_period(&mut self, row: &PeriodRow) -> OutputResult<()> {
        self.periods.write_record(&[
            row.period.to_string(),
            row.window_start.to_string(),
            row.window_end.to_string(),
            row.objective.to_string(),
            row.committed_volume.to_string(),
            row.committed_area.to_string(),
            row.agent_status.to_string(),
            row.realized_flow.to_string(),
            row.agent_cost.to_string(),
            (row.degraded as u8).to_string(),
            row.remaining_area.to_string(),
            row.backlog.to_string(),
            row.note.clone(),
        ])?;
        Ok(())
    }

    fn write_commitments(&mut self, rows: &[CommitmentRow]) -> OutputResult<()> {
        for row in rows {
            self.commitments.write_record(&[
                row.period.to_string(),
                row.stratum.clone(),
                row.product.clone(),
                row.volume.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.periods.flush()?;
        self.commitments.flush()?;
        Ok(())
    }
}
