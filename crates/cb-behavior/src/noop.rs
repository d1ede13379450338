//! A candidate that is registered but never eligible.

use cb_core::Typology;

use crate::{Candidate, CandidateInfo, Execution, Finished, ScoreDefinition, TickContext};

/// Useful as a placeholder in tests or to reserve a name in the inspection
/// panel.
pub struct NoopCandidate {
    info: CandidateInfo,
}

impl NoopCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { info: CandidateInfo::new(name, Typology::Utility, ScoreDefinition::Static(0.0)) }
    }
}

impl Candidate for NoopCandidate {
    fn info(&self) -> &CandidateInfo {
        &self.info
    }

    fn evaluate(&self, _ctx: &TickContext<'_>, _attempted: &[&str]) -> Option<f32> {
        None
    }

    fn execute(&mut self, _ctx: &TickContext<'_>) -> Box<dyn Execution> {
        Finished::skipped()
    }
}
