//! CSV trace backend.
//!
//! Creates two files in the configured directory:
//! - `candidate_scores.csv`
//! - `tick_outcomes.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{CandidateScoreRow, OutputResult, TickOutcomeRow};

pub struct CsvTraceWriter {
    scores:   Writer<File>,
    outcomes: Writer<File>,
    finished: bool,
}

impl CsvTraceWriter {
    /// Create (truncating) both files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut scores = Writer::from_path(dir.join("candidate_scores.csv"))?;
        scores.write_record(["account", "tick", "now_ms", "candidate", "name", "typology", "status", "score"])?;

        let mut outcomes = Writer::from_path(dir.join("tick_outcomes.csv"))?;
        outcomes.write_record(["account", "tick", "now_ms", "state", "outcome", "candidate", "result"])?;

        Ok(Self { scores, outcomes, finished: false })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_scores(&mut self, rows: &[CandidateScoreRow]) -> OutputResult<()> {
        for row in rows {
            self.scores.write_record(&[
                row.account.clone(),
                row.tick.to_string(),
                row.now_ms.to_string(),
                row.candidate.to_string(),
                row.name.clone(),
                row.typology.to_owned(),
                row.status.to_owned(),
                row.score.map(|s| s.to_string()).unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn write_outcome(&mut self, row: &TickOutcomeRow) -> OutputResult<()> {
        self.outcomes.write_record(&[
            row.account.clone(),
            row.tick.to_string(),
            row.now_ms.to_string(),
            row.state.to_owned(),
            row.outcome.to_owned(),
            row.candidate.clone().unwrap_or_default(),
            row.result.unwrap_or_default().to_owned(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.scores.flush()?;
        self.outcomes.flush()?;
        Ok(())
    }
}
