//! SQLite trace backend (feature `sqlite`).
//!
//! Creates `trace.db` in the configured directory with two tables:
//! `candidate_scores` and `tick_outcomes`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::TraceWriter;
use crate::{CandidateScoreRow, OutputResult, TickOutcomeRow};

pub struct SqliteTraceWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteTraceWriter {
    /// Open (or create) `trace.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("trace.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS candidate_scores (
                 account   TEXT    NOT NULL,
                 tick      INTEGER NOT NULL,
                 now_ms    INTEGER NOT NULL,
                 candidate INTEGER NOT NULL,
                 name      TEXT    NOT NULL,
                 typology  TEXT    NOT NULL,
                 status    TEXT    NOT NULL,
                 score     REAL
             );
             CREATE TABLE IF NOT EXISTS tick_outcomes (
                 account   TEXT    NOT NULL,
                 tick      INTEGER NOT NULL,
                 now_ms    INTEGER NOT NULL,
                 state     TEXT    NOT NULL,
                 outcome   TEXT    NOT NULL,
                 candidate TEXT,
                 result    TEXT,
                 PRIMARY KEY (account, tick)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl TraceWriter for SqliteTraceWriter {
    fn write_scores(&mut self, rows: &[CandidateScoreRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO candidate_scores \
                 (account, tick, now_ms, candidate, name, typology, status, score) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.account,
                    row.tick as i64,
                    row.now_ms as i64,
                    row.candidate,
                    row.name,
                    row.typology,
                    row.status,
                    row.score.map(f64::from),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_outcome(&mut self, row: &TickOutcomeRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_outcomes (account, tick, now_ms, state, outcome, candidate, result) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                row.account,
                row.tick as i64,
                row.now_ms as i64,
                row.state,
                row.outcome,
                row.candidate,
                row.result,
            ],
        )?;
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
