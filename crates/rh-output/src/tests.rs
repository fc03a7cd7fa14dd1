//! Integration tests for rh-output.

#[cfg(test)]
mod fixtures {
    use rh_core::RunConfig;

    use crate::{CommitmentRow, PeriodRow};

    pub fn period_row(period: u32, degraded: bool) -> PeriodRow {
        PeriodRow {
            period,
            window_start:     period,
            window_end:       period + 2,
            objective:        1000.0,
            committed_volume: 1000.0,
            committed_area:   100.0,
            agent_status:     if degraded { "infeasible" } else { "feasible" },
            realized_flow:    if degraded { 0.0 } else { 1000.0 },
            agent_cost:       0.0,
            degraded,
            remaining_area:   50.0,
            backlog:          if degraded { 1000.0 } else { 0.0 },
            note:             String::new(),
        }
    }

    pub fn commitment_rows(period: u32) -> Vec<CommitmentRow> {
        vec![
            CommitmentRow { period, stratum: "S0".into(), product: "sawlog".into(), volume: 600.0 },
            CommitmentRow { period, stratum: "S1".into(), product: "sawlog".into(), volume: 400.0 },
        ]
    }

    pub fn config(end: u32) -> RunConfig {
        let mut c = RunConfig::default();
        c.horizon.horizon_periods = 4;
        c.horizon.end_period = end;
        c.agent_behavior.name = "accept_all".into();
        c
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::fixtures::{commitment_rows, period_row};
    use crate::csv::{COMMITMENT_HEADERS, CsvWriter, PERIOD_HEADERS};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("periods.csv").exists());
        assert!(dir.path().join("commitments.csv").exists());
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("default");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("periods.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("periods.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, PERIOD_HEADERS);

        let mut rdr = csv::Reader::from_path(dir.path().join("commitments.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, COMMITMENT_HEADERS);
    }

    #[test]
    fn csv_period_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_period(&period_row(0, false)).unwrap();
        w.write_period(&period_row(1, true)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("periods.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][4], "1000"); // committed_volume
        assert_eq!(&rows[0][6], "feasible");
        assert_eq!(&rows[1][6], "infeasible");
        assert_eq!(&rows[1][9], "1"); // degraded
    }

    #[test]
    fn csv_commitments_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_commitments(&commitment_rows(3)).unwrap();
        w.write_commitments(&[]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("commitments.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "3");
        assert_eq!(&rows[1][1], "S1");
        assert_eq!(&rows[1][3], "400");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod multi_tests {
    use super::fixtures::period_row;
    use crate::{CommitmentRow, MultiWriter, OutputError, OutputResult, OutputWriter, PeriodRow};

    #[derive(Default)]
    struct Counting {
        periods:  usize,
        finishes: usize,
        fail:     bool,
    }

    struct Shared(std::rc::Rc<std::cell::RefCell<Counting>>);

    impl OutputWriter for Shared {
        fn write_period(&mut self, _: &PeriodRow) -> OutputResult<()> {
            self.0.borrow_mut().periods += 1;
            Ok(())
        }

        fn write_commitments(&mut self, _: &[CommitmentRow]) -> OutputResult<()> {
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            let mut c = self.0.borrow_mut();
            c.finishes += 1;
            if c.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            Ok(())
        }
    }

    #[test]
    fn forwards_to_every_writer() {
        let a = std::rc::Rc::new(std::cell::RefCell::new(Counting { fail: true, ..Default::default() }));
        let b = std::rc::Rc::new(std::cell::RefCell::new(Counting::default()));
        let mut multi = MultiWriter::new();
        multi.push(Box::new(Shared(a.clone()))).push(Box::new(Shared(b.clone())));
        assert_eq!(multi.len(), 2);

        multi.write_period(&period_row(0, false)).unwrap();
        assert!(multi.finish().is_err());
        assert_eq!(a.borrow().periods, 1);
        assert_eq!(b.borrow().periods, 1);
        // A failing writer does not stop the others from finishing.
        assert_eq!(b.borrow().finishes, 1);
    }
}

#[cfg(test)]
mod observer_tests {
    use tempfile::TempDir;

    use rh_data::synthesize;
    use rh_sim::{RunOutcome, SimBuilder};

    use super::fixtures::config;
    use crate::{CsvWriter, MANIFEST_FILE, RunManifest, SimOutputObserver};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn integration_csv() {
        let dir = tmp();
        let mut sim = SimBuilder::new(config(6), synthesize().unwrap()).build().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");
        assert_eq!(obs.periods_written(), 6);
        assert_eq!(obs.outcome(), Some(&RunOutcome::Completed { periods: 6 }));

        let mut rdr = csv::Reader::from_path(dir.path().join("periods.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[5][0], "5");

        let committed: usize = sim.records().iter().map(|r| r.commitments.len()).sum();
        let mut rdr = csv::Reader::from_path(dir.path().join("commitments.csv")).unwrap();
        assert_eq!(rdr.records().count(), committed);
    }

    #[test]
    fn manifest_records_run() {
        let dir = tmp();
        let mut sim = SimBuilder::new(config(3), synthesize().unwrap()).build().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();

        let outcome = obs.outcome().cloned().unwrap();
        let path = RunManifest::from_simulator(&sim, outcome).write(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(MANIFEST_FILE));

        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["seed"], 42);
        assert_eq!(json["solver"], "minilp");
        assert_eq!(json["policy"], "max_volume");
        assert_eq!(json["reactor"], "accept_all");
        assert_eq!(json["periods"], 3);
        assert_eq!(json["outcome"]["status"], "completed");
        assert_eq!(json["config"]["horizon"]["end_period"], 3);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn manifest_records_abort() {
        let dir = tmp();
        let sim = SimBuilder::new(config(3), synthesize().unwrap()).build().unwrap();
        let outcome = RunOutcome::Aborted { period: Some(rh_core::Period(2)), reason: "window model infeasible".into() };
        RunManifest::from_simulator(&sim, outcome).write(dir.path()).unwrap();

        let text = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["outcome"]["status"], "aborted");
        assert_eq!(json["outcome"]["period"], 2);
        assert_eq!(json["periods"], 0);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::fixtures::{commitment_rows, period_row};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_period_and_commitments() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_period(&period_row(4, true)).unwrap();
        w.write_commitments(&commitment_rows(4)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (status, degraded, backlog): (String, i64, f64) = conn
            .query_row(
                "SELECT agent_status, degraded, backlog FROM periods WHERE period = 4",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(status, "infeasible");
        assert_eq!(degraded, 1);
        assert_eq!(backlog, 1000.0);

        let total: f64 = conn
            .query_row("SELECT SUM(volume) FROM commitments WHERE period = 4", [], |r| r.get(0))
            .unwrap();
        assert_eq!(total, 1000.0);
    }

    #[test]
    fn sqlite_reopen_starts_fresh() {
        let dir = tmp();
        {
            let mut w = SqliteWriter::new(dir.path()).unwrap();
            w.write_period(&period_row(0, false)).unwrap();
            w.finish().unwrap();
        }
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_period(&period_row(0, false)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM periods", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 1);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::fixtures::{commitment_rows, period_row};
    use crate::parquet::ParquetWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("periods.parquet").exists());
        assert!(dir.path().join("commitments.parquet").exists());
    }

    #[test]
    fn parquet_commitments_round_trip() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_commitments(&commitment_rows(1)).unwrap();
        w.write_commitments(&commitment_rows(2)).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("commitments.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let total_rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 4);

        let field_names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(field_names, ["period", "stratum", "product", "volume"]);
    }

    #[test]
    fn parquet_degraded_is_boolean() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_period(&period_row(0, true)).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("periods.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let field = builder.schema().field_with_name("degraded").unwrap().clone();
        assert_eq!(*field.data_type(), DataType::Boolean);
    }
}
