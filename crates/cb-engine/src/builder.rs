//! Fluent builder for constructing a [`DecisionLoop`].

use std::sync::Arc;

use cb_behavior::Candidate;
use cb_core::AccountId;
use cb_coord::{CoordinationContext, SharedBus};

use crate::{DecisionLoop, EngineConfig, EngineResult, Registry};

/// Fluent builder for [`DecisionLoop`].
///
/// # Required inputs
///
/// - [`AccountId`]: the stable identity this loop acts and publishes as
/// - a [`SharedBus`]: shared with every other loop of the party
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                  |
/// |-------------------|--------------------------|
/// | `.config(c)`      | `EngineConfig::default()` |
/// | `.candidate(c)`   | no candidates            |
///
/// Candidates are registered in call order; that order is the final
/// selection tie-break.
///
/// # Example
///
/// ```rust,ignore
/// let bus: Arc<dyn SharedBus> = Arc::new(MemoryBus::new());
/// let mut decision = DecisionLoopBuilder::new(account, bus)
///     .config(cfg)
///     .candidate(FollowFlag::default())
///     .candidate(ObeyPartyCommands::default())
///     .build()?;
/// ```
pub struct DecisionLoopBuilder {
    account:    AccountId,
    bus:        Arc<dyn SharedBus>,
    config:     EngineConfig,
    candidates: Vec<Box<dyn Candidate>>,
}

impl DecisionLoopBuilder {
    pub fn new(account: AccountId, bus: Arc<dyn SharedBus>) -> Self {
        Self {
            account,
            bus,
            config: EngineConfig::default(),
            candidates: Vec::new(),
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn candidate(self, candidate: impl Candidate + 'static) -> Self {
        self.boxed(Box::new(candidate))
    }

    pub fn boxed(mut self, candidate: Box<dyn Candidate>) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Validate the configuration and every candidate, register the account
    /// on the bus, and return a loop in the `Idle` phase.
    pub fn build(self) -> EngineResult<DecisionLoop> {
        self.config.validate()?;

        let mut registry = Registry::new();
        for candidate in self.candidates {
            registry.register(candidate)?;
        }

        let coord = CoordinationContext::new(self.account, self.bus, self.config.coordination.clone())?;
        Ok(DecisionLoop::from_parts(registry, coord, self.config.classifier))
    }
}
