//! `TraceObserver<W>` bridges `LoopObserver` to a `TraceWriter`.

use cb_core::Tick;
use cb_engine::{LoopObserver, TickReport};

use crate::row::{CandidateScoreRow, TickOutcomeRow};
use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult};

/// A [`LoopObserver`] that writes every scoring pass and every tick outcome
/// to a [`TraceWriter`] backend.
///
/// Writer errors are stored because observer callbacks return nothing.
/// Check with [`take_error`](Self::take_error) after the run.
pub struct TraceObserver<W: TraceWriter> {
    writer:     W,
    last_error: Option<OutputError>,
    rows:       usize,
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None, rows: 0 }
    }

    /// The first write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Rows handed to the writer so far (both tables).
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter> LoopObserver for TraceObserver<W> {
    fn on_tick(&mut self, report: &TickReport<'_>) {
        let account = report.account.as_str();
        if !report.scores.is_empty() {
            let rows: Vec<CandidateScoreRow> = report
                .scores
                .iter()
                .map(|e| CandidateScoreRow {
                    account:   account.to_owned(),
                    tick:      report.tick.0,
                    now_ms:    report.now.0,
                    candidate: e.candidate.0,
                    name:      e.name.clone(),
                    typology:  e.typology.as_str(),
                    status:    e.status.as_str(),
                    score:     e.score,
                })
                .collect();
            let result = self.writer.write_scores(&rows);
            if result.is_ok() {
                self.rows += rows.len();
            }
            self.store_err(result);
        }

        let row = TickOutcomeRow {
            account:   account.to_owned(),
            tick:      report.tick.0,
            now_ms:    report.now.0,
            state:     report.state.as_str(),
            outcome:   report.outcome.as_str(),
            candidate: report.candidate.map(str::to_owned),
            result:    report.outcome.result().map(|r| r.as_str()),
        };
        let result = self.writer.write_outcome(&row);
        if result.is_ok() {
            self.rows += 1;
        }
        self.store_err(result);
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
