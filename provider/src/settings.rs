//! User settings and their local JSON cache
//!
//! Settings carry display-unit preferences and the per-attribute daily
//! aggregation policy. The backend copy is authoritative; a JSON-encoded
//! copy under a fixed key serves as a fast-path fallback before the backend
//! responds. Cache decode failures degrade to `None`, never error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use biometrics_core::UnitPreferences;

/// Fixed key under which settings are cached locally
pub const SETTINGS_CACHE_KEY: &str = "settings";

/// How multiple same-day platform readings collapse into one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DailyMeasurementPolicy {
    /// Keep the most recent reading of the day
    #[default]
    Last,
    /// Average all readings of the day
    Average,
}

/// User-level settings read by the calculation pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub units: UnitPreferences,
    pub weight_policy: DailyMeasurementPolicy,
    pub lean_body_mass_policy: DailyMeasurementPolicy,
}

/// Minimal string key-value cache the host supplies (user defaults, a
/// file, an in-memory map in tests)
pub trait KeyValueCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

impl Settings {
    /// Fast-path read from the local cache; any failure yields `None`
    pub fn load_cached(cache: &dyn KeyValueCache) -> Option<Settings> {
        let raw = cache.get(SETTINGS_CACHE_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(settings) => Some(settings),
            Err(error) => {
                warn!(%error, "discarding undecodable settings cache");
                None
            }
        }
    }

    /// Refresh the local cache after a backend read
    pub fn store_cached(&self, cache: &dyn KeyValueCache) {
        match serde_json::to_string(self) {
            Ok(raw) => cache.set(SETTINGS_CACHE_KEY, raw),
            Err(error) => warn!(%error, "failed to encode settings cache"),
        }
    }
}
