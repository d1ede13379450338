//! `cb-output`: decision trace writers for the rust_cb decision engine.
//!
//! | Feature   | Backend | Files created                                   |
//! |-----------|---------|-------------------------------------------------|
//! | *(none)*  | CSV     | `candidate_scores.csv`, `tick_outcomes.csv`     |
//! | `sqlite`  | SQLite  | `trace.db`                                      |
//!
//! Both backends implement [`TraceWriter`] and are driven by
//! [`TraceObserver`], which implements `cb_engine::LoopObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cb_output::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./trace"))?;
//! let mut obs = TraceObserver::new(writer);
//! party.run(400, &mut obs);
//! if let Some(e) = obs.take_error() { eprintln!("trace error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{CandidateScoreRow, TickOutcomeRow};
pub use writer::TraceWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTraceWriter;
