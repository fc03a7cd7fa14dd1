//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `periods` and `commitments`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{CommitmentRow, OutputResult, PeriodRow};

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    ///
    /// Tables left by an earlier run in the same directory are dropped.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS periods;
             DROP TABLE IF EXISTS commitments;
             CREATE TABLE periods (
                 period           INTEGER PRIMARY KEY,
                 window_start     INTEGER NOT NULL,
                 window_end       INTEGER NOT NULL,
                 objective        REAL    NOT NULL,
                 committed_volume REAL    NOT NULL,
                 committed_area   REAL    NOT NULL,
                 agent_status     TEXT    NOT NULL,
                 realized_flow    REAL    NOT NULL,
                 agent_cost       REAL    NOT NULL,
                 degraded         INTEGER NOT NULL,
                 remaining_area   REAL    NOT NULL,
                 backlog          REAL    NOT NULL,
                 note             TEXT    NOT NULL
             );
             CREATE TABLE commitments (
                 period  INTEGER NOT NULL,
                 stratum TEXT    NOT NULL,
                 product TEXT    NOT NULL,
                 volume  REAL    NOT NULL,
                 PRIMARY KEY (period, stratum, product)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_period(&mut self, row: &PeriodRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO periods \
             (period, window_start, window_end, objective, committed_volume, committed_area, \
              agent_status, realized_flow, agent_cost, degraded, remaining_area, backlog, note) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            rusqlite::params![
                row.period,
                row.window_start,
                row.window_end,
                row.objective,
                row.committed_volume,
                row.committed_area,
                row.agent_status,
                row.realized_flow,
                row.agent_cost,
                row.degraded as i64,
                row.remaining_area,
                row.backlog,
                row.note,
            ],
        )?;
        Ok(())
    }

    fn write_commitments(&mut self, rows: &[CommitmentRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO commitments (period, stratum, product, volume) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.period, row.stratum, row.product, row.volume])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
