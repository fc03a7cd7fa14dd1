//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `periods.parquet`
//! - `commitments.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{BooleanBuilder, Float64Builder, StringBuilder, UInt32Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{CommitmentRow, OutputResult, PeriodRow};

fn period_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("period",           DataType::UInt32,  false),
        Field::new("window_start",     DataType::UInt32,  false),
        Field::new("window_end",       DataType::UInt32,  false),
        Field::new("objective",        DataType::Float64, false),
        Field::new("committed_volume", DataType::Float64, false),
        Field::new("committed_area",   DataType::Float64, false),
        Field::new("agent_status",     DataType::Utf8,    false),
        Field::new("realized_flow",    DataType::Float64, false),
        Field::new("agent_cost",       DataType::Float64, false),
        Field::new("degraded",         DataType::Boolean, false),
        Field::new("remaining_area",   DataType::Float64, false),
        Field::new("backlog",          DataType::Float64, false),
        Field::new("note",             DataType::Utf8,    false),
    ]))
}

fn commitment_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("period",  DataType::UInt32,  false),
        Field::new("stratum", DataType::Utf8,    false),
        Field::new("product", DataType::Utf8,    false),
        Field::new("volume",  DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes run output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    periods:       Option<ArrowWriter<File>>,
    commitments:   Option<ArrowWriter<File>>,
    period_schema: Arc<Schema>,
    commit_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let period_schema = period_schema();
        let commit_schema = commitment_schema();

        let periods = ArrowWriter::try_new(
            File::create(dir.join("periods.parquet"))?,
            Arc::clone(&period_schema),
            Some(snappy_props()),
        )?;
        let commitments = ArrowWriter::try_new(
            File::create(dir.join("commitments.parquet"))?,
            Arc::clone(&commit_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            periods: Some(periods),
            commitments: Some(commitments),
            period_schema,
            commit_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_period(&mut self, row: &PeriodRow) -> OutputResult<()> {
        let Some(writer) = self.periods.as_mut() else {
            return Ok(());
        };

        let mut period        = UInt32Builder::new();
        let mut window_start  = UInt32Builder::new();
        let mut window_end    = UInt32Builder::new();
        let mut objective     = Float64Builder::new();
        let mut volume        = Float64Builder::new();
        let mut area          = Float64Builder::new();
        let mut status        = StringBuilder::new();
        let mut realized      = Float64Builder::new();
        let mut cost          = Float64Builder::new();
        let mut degraded      = BooleanBuilder::new();
        let mut remaining     = Float64Builder::new();
        let mut backlog       = Float64Builder::new();
        let mut note          = StringBuilder::new();

        period.append_value(row.period);
        window_start.append_value(row.window_start);
        window_end.append_value(row.window_end);
        objective.append_value(row.objective);
        volume.append_value(row.committed_volume);
        area.append_value(row.committed_area);
        status.append_value(row.agent_status);
        realized.append_value(row.realized_flow);
        cost.append_value(row.agent_cost);
        degraded.append_value(row.degraded);
        remaining.append_value(row.remaining_area);
        backlog.append_value(row.backlog);
        note.append_value(&row.note);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.period_schema),
            vec![
                Arc::new(period.finish()),
                Arc::new(window_start.finish()),
                Arc::new(window_end.finish()),
                Arc::new(objective.finish()),
                Arc::new(volume.finish()),
                Arc::new(area.finish()),
                Arc::new(status.finish()),
                Arc::new(realized.finish()),
                Arc::new(cost.finish()),
                Arc::new(degraded.finish()),
                Arc::new(remaining.finish()),
                Arc::new(backlog.finish()),
                Arc::new(note.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_commitments(&mut self, rows: &[CommitmentRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.commitments.as_mut() else {
            return Ok(());
        };

        let mut periods  = UInt32Builder::new();
        let mut strata   = StringBuilder::new();
        let mut products = StringBuilder::new();
        let mut volumes  = Float64Builder::new();

        for row in rows {
            periods.append_value(row.period);
            strata.append_value(&row.stratum);
            products.append_value(&row.product);
            volumes.append_value(row.volume);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.commit_schema),
            vec![
                Arc::new(periods.finish()),
                Arc::new(strata.finish()),
                Arc::new(products.finish()),
                Arc::new(volumes.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.periods.take() {
            w.close()?;
        }
        if let Some(w) = self.commitments.take() {
            w.close()?;
        }
        Ok(())
    }
}
