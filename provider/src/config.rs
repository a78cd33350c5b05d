//! Provider configuration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for a `HealthProvider` instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Quiescence window that collapses rapid date-picker scrubbing into a
    /// single displayed-date fetch, in milliseconds
    pub display_date_debounce_ms: u64,
    /// Start of history recalculation when the store reports no data yet
    pub fallback_start_date: Option<NaiveDate>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            display_date_debounce_ms: 100,
            fallback_start_date: None,
        }
    }
}

impl ProviderConfig {
    pub fn display_date_debounce(&self) -> Duration {
        Duration::from_millis(self.display_date_debounce_ms)
    }
}
