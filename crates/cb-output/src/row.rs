//! Plain data rows written by trace backends.

/// One candidate's scoring result on one tick of one account.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScoreRow {
    pub account:   String,
    pub tick:      u64,
    pub now_ms:    u64,
    pub candidate: u32,
    pub name:      String,
    pub typology:  &'static str,
    pub status:    &'static str,
    /// Empty cell / NULL when the candidate produced no score.
    pub score:     Option<f32>,
}

/// What one tick of one account ended with.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcomeRow {
    pub account:   String,
    pub tick:      u64,
    pub now_ms:    u64,
    pub state:     &'static str,
    pub outcome:   &'static str,
    pub candidate: Option<String>,
    /// `performed` / `skipped` for completed executions only.
    pub result:    Option<&'static str>,
}
