//! Flat arena of registered candidates.
//!
//! A candidate is addressed by its [`CandidateId`], which is its
//! registration index.  The registry owns everything mutable about a
//! candidate that the engine manages: the enabled flag, the throttle and the
//! last score.

use rustc_hash::FxHashMap;

use cb_behavior::Candidate;
use cb_core::CandidateId;

use crate::{EngineError, EngineResult, Throttle};

pub struct Slot {
    pub candidate: Box<dyn Candidate>,
    pub enabled: bool,
    pub throttle: Throttle,
    pub last_score: Option<f32>,
}

impl Slot {
    pub fn name(&self) -> &str {
        &self.candidate.info().name
    }
}

#[derive(Default)]
pub struct Registry {
    slots: Vec<Slot>,
    by_name: FxHashMap<String, CandidateId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a candidate.  Names must be unique because they
    /// key the shared candidate toggles.
    pub fn register(&mut self, candidate: Box<dyn Candidate>) -> EngineResult<CandidateId> {
        let info = candidate.info();
        info.validate()?;
        if self.by_name.contains_key(&info.name) {
            return Err(EngineError::DuplicateCandidate(info.name.clone()));
        }
        let id = CandidateId::try_from(self.slots.len())
            .map_err(|_| EngineError::Config("too many candidates".into()))?;
        self.by_name.insert(info.name.clone(), id);
        let throttle = Throttle::new(info.throttle_ms);
        self.slots.push(Slot { candidate, enabled: true, throttle, last_score: None });
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: CandidateId) -> Option<&Slot> {
        self.slots.get(id.index())
    }

    pub fn get_mut(&mut self, id: CandidateId) -> Option<&mut Slot> {
        self.slots.get_mut(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<CandidateId> {
        self.by_name.get(name).copied()
    }

    /// Slots in registration order, with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (CandidateId, &Slot)> {
        self.slots.iter().enumerate().map(|(i, s)| (CandidateId(i as u32), s))
    }

    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.slots.iter_mut()
    }
}
