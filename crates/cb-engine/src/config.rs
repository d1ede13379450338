//! Engine configuration.
//!
//! # TOML format
//!
//! Every key is optional; missing keys take the defaults below.
//!
//! ```toml
//! tick_duration_ms = 250
//!
//! [classifier]
//! aggro_range = 1012.0
//! close_range = 2500.0
//!
//! [coordination]
//! sync_interval_ms      = 0
//! seen_message_capacity = 256
//! inbox_capacity        = 64
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use cb_behavior::ClassifierConfig;
use cb_coord::CoordinationConfig;

use crate::{EngineError, EngineResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Environment milliseconds per decision tick in simulated runs.
    pub tick_duration_ms: u32,
    pub classifier: ClassifierConfig,
    pub coordination: CoordinationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_duration_ms: 250,
            classifier: ClassifierConfig::default(),
            coordination: CoordinationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Read and validate a TOML file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        let cfg: EngineConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.tick_duration_ms == 0 {
            return Err(EngineError::Config("tick_duration_ms must be positive".into()));
        }
        let c = &self.classifier;
        if !(c.aggro_range.is_finite() && c.close_range.is_finite()) || c.aggro_range < 0.0 {
            return Err(EngineError::Config("classifier ranges must be non-negative numbers".into()));
        }
        if c.close_range < c.aggro_range {
            return Err(EngineError::Config(format!(
                "close_range ({}) is inside aggro_range ({})",
                c.close_range, c.aggro_range
            )));
        }
        if self.coordination.seen_message_capacity == 0 {
            return Err(EngineError::Config("seen_message_capacity must be positive".into()));
        }
        if self.coordination.inbox_capacity == 0 {
            return Err(EngineError::Config("inbox_capacity must be positive".into()));
        }
        Ok(())
    }
}
