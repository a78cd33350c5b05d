//! Collaborator contracts
//!
//! The backend day store, the external health-platform oracle, the settings
//! store, and the plan oracle are consumed through these traits only; their
//! implementations live with the host application. Oracle reads are
//! fallible but the sampling layer degrades per-date failures to `None`
//! rather than letting them abort a pass.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use biometrics_core::HealthDetails;

use crate::error::{OracleError, StoreError};
use crate::settings::Settings;

/// One backend day record: the health snapshot plus that day's logged
/// dietary energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub health_details: HealthDetails,
    /// Total dietary energy logged in the backend for this day
    pub dietary_energy_kcal: Option<f64>,
}

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            health_details: HealthDetails::new(date),
            dietary_energy_kcal: None,
        }
    }
}

/// Backend day store, keyed by calendar date
#[async_trait]
pub trait DayStore: Send + Sync {
    /// Fetch the day, creating an empty one if absent
    async fn fetch_or_create_day(&self, date: NaiveDate) -> Result<Day, StoreError>;

    /// Idempotent upsert
    async fn save_day(&self, day: &Day) -> Result<(), StoreError>;

    /// All days in `[from, to]`, in date order
    async fn fetch_all_days(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        create_if_missing: bool,
    ) -> Result<BTreeMap<NaiveDate, Day>, StoreError>;

    /// First date the user has any data, if any
    async fn days_start_date(&self) -> Result<Option<NaiveDate>, StoreError>;
}

/// Quantity kinds the oracle can be asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityType {
    Weight,
    LeanBodyMass,
    Height,
    RestingEnergy,
    ActiveEnergy,
    DietaryEnergy,
}

/// A single reading from the health platform, in canonical units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    /// The date the reading was taken, when the platform reports one
    pub date: Option<NaiveDate>,
}

/// External health-platform oracle, read side plus an explicit resync hook
#[async_trait]
pub trait HealthOracle: Send + Sync {
    /// Most recent reading on or before `date`
    async fn latest_quantity(
        &self,
        quantity_type: QuantityType,
        date: NaiveDate,
    ) -> Result<Option<Quantity>, OracleError>;

    /// All same-day readings for `date`, if any
    async fn daily_quantities(
        &self,
        quantity_type: QuantityType,
        date: NaiveDate,
    ) -> Result<Option<Vec<Quantity>>, OracleError>;

    /// Total dietary energy per day over `[from, to]`, keyed by day offset
    /// from `from`. Days without data are absent from the map.
    async fn total_dietary_energy(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<HashMap<i64, f64>>, OracleError>;

    /// Push locally-changed syncable attributes back to the platform
    async fn resync(&self) -> Result<(), OracleError>;
}

/// Read-only settings snapshot used during a calculation pass
pub trait SettingsStore: Send + Sync {
    fn settings(&self) -> Settings;
}

/// Goal/plan dependency oracle, queried before destructive weight edits
#[async_trait]
pub trait PlanOracle: Send + Sync {
    async fn is_plan_weight_dependent(&self, date: NaiveDate) -> bool;
}
