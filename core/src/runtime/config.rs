//! Runtime configuration

use std::time::Duration;

use fcsim_shared::constants::{DEFAULT_DIAGNOSTIC_HISTORY, DEFAULT_RAM_LIMIT, MIN_TIMER_INTERVAL_MS};
use serde::{Deserialize, Serialize};

/// Per-instance limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum linear memory in bytes
    pub ram_limit: usize,
    /// Shortest timer interval the module may request
    pub min_timer_interval_ms: u64,
    /// Diagnostic lines kept for draining
    pub diagnostic_history: usize,
}

impl RuntimeConfig {
    pub fn min_timer_interval(&self) -> Duration {
        Duration::from_millis(self.min_timer_interval_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            ram_limit: DEFAULT_RAM_LIMIT,
            min_timer_interval_ms: MIN_TIMER_INTERVAL_MS,
            diagnostic_history: DEFAULT_DIAGNOSTIC_HISTORY,
        }
    }
}
