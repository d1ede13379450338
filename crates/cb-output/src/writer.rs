//! The `TraceWriter` trait implemented by all backend writers.

use crate::{CandidateScoreRow, OutputResult, TickOutcomeRow};

/// Implemented by the CSV and SQLite writers.
///
/// Errors surface to the caller here; [`TraceObserver`](crate::TraceObserver)
/// stores them because observer callbacks cannot return one.
pub trait TraceWriter {
    fn write_scores(&mut self, rows: &[CandidateScoreRow]) -> OutputResult<()>;

    fn write_outcome(&mut self, row: &TickOutcomeRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.  Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
