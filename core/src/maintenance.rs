//! Maintenance energy: adaptive calculation and its supporting types
//!
//! The adaptive maintenance value compares observed weight change against
//! logged dietary energy over an interval. The estimated value is the
//! additive fallback (resting + active energy). Exactly one of the adaptive
//! result's `{value, error}` pair is set after recalculation.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::attributes::{ActiveEnergy, RestingEnergy};
use crate::units::kcal_equivalent_of_kg;

// ============================================================================
// Interval
// ============================================================================

/// Period granularity of a health interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntervalPeriod {
    Day,
    #[default]
    Week,
}

impl IntervalPeriod {
    /// Legal `value` range for this period. Enforcement is the caller's
    /// job (pickers clamp on write); the type stores what it is given.
    pub fn legal_range(&self) -> std::ops::RangeInclusive<u32> {
        match self {
            IntervalPeriod::Day => 3..=6,
            IntervalPeriod::Week => 1..=2,
        }
    }
}

/// A lookback interval expressed in days or weeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInterval {
    pub value: u32,
    pub period: IntervalPeriod,
}

impl Default for HealthInterval {
    fn default() -> Self {
        Self { value: 1, period: IntervalPeriod::Week }
    }
}

impl HealthInterval {
    pub fn new(value: u32, period: IntervalPeriod) -> Self {
        Self { value, period }
    }

    pub fn number_of_days(&self) -> u32 {
        match self.period {
            IntervalPeriod::Day => self.value,
            IntervalPeriod::Week => self.value * 7,
        }
    }

    /// The first date of the lookback window ending just before `date`
    pub fn start_date(&self, date: NaiveDate) -> NaiveDate {
        date - Duration::days(i64::from(self.number_of_days()))
    }

    /// Copy with `value` clamped into the period's legal range
    pub fn clamped(&self) -> Self {
        let range = self.period.legal_range();
        Self {
            value: self.value.clamp(*range.start(), *range.end()),
            period: self.period,
        }
    }
}

// ============================================================================
// Weight change
// ============================================================================

/// Where a weight sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightSampleSource {
    #[default]
    HealthPlatform,
    UserEntered,
}

/// One endpoint of a weight change: a point reading or a moving average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeightSample {
    pub kg: Option<f64>,
    pub source: WeightSampleSource,
    pub is_daily_average: bool,
    /// When set, `kg` is the mean of `moving_average_kg`
    pub moving_average_interval: Option<HealthInterval>,
    /// Per-day readings keyed by offset within the moving-average window.
    /// Days with no reading are absent, never zero-filled.
    pub moving_average_kg: Option<BTreeMap<u32, f64>>,
}

impl WeightSample {
    /// Restore the moving-average invariant: `kg` equals the arithmetic
    /// mean of the window values; an empty window clears `kg`.
    pub fn recompute_moving_average(&mut self) {
        if let Some(values) = &self.moving_average_kg {
            if values.is_empty() {
                self.kg = None;
            } else {
                let sum: f64 = values.values().sum();
                self.kg = Some(sum / values.len() as f64);
            }
        }
    }
}

/// Weight delta between the interval's endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeightChange {
    pub current: WeightSample,
    pub previous: WeightSample,
}

impl WeightChange {
    /// `current - previous` in kg; `None` if either endpoint is missing
    pub fn delta_kg(&self) -> Option<f64> {
        Some(self.current.kg? - self.previous.kg?)
    }

    /// The delta converted to kcal at 3500 kcal per pound of fat
    pub fn delta_energy_equivalent_kcal(&self) -> Option<f64> {
        self.delta_kg().map(kcal_equivalent_of_kg)
    }
}

// ============================================================================
// Dietary energy
// ============================================================================

/// Provenance of a per-day dietary energy sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DietaryEnergySampleType {
    #[default]
    LoggedBackend,
    HealthPlatform,
    /// Gap-filled with the mean of the known samples
    Averaged,
    UserEntered,
}

/// One day's dietary energy within the interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DietaryEnergySample {
    #[serde(rename = "type")]
    pub sample_type: DietaryEnergySampleType,
    pub kcal: Option<f64>,
}

/// Dietary energy over the interval: one sample per day, oldest first.
/// Invariant: `samples.len() == interval.number_of_days()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DietaryEnergy {
    pub samples: Vec<DietaryEnergySample>,
}

impl DietaryEnergy {
    /// One empty sample slot per day of the interval
    pub fn empty(interval: HealthInterval) -> Self {
        Self {
            samples: vec![DietaryEnergySample::default(); interval.number_of_days() as usize],
        }
    }

    /// Replace every missing sample with the mean of the known ones,
    /// marking it `Averaged`. A fully-empty set stays empty.
    pub fn fill_empty_values_with_averages(&mut self) {
        let known: Vec<f64> = self.samples.iter().filter_map(|s| s.kcal).collect();
        if known.is_empty() {
            return;
        }
        let average = known.iter().sum::<f64>() / known.len() as f64;
        for sample in &mut self.samples {
            if sample.kcal.is_none() {
                sample.sample_type = DietaryEnergySampleType::Averaged;
                sample.kcal = Some(average);
            }
        }
    }

    /// Total over the interval, treating missing samples as the mean of
    /// the known ones. `None` only when every sample is missing.
    pub fn total_kcal(&self) -> Option<f64> {
        let known: Vec<f64> = self.samples.iter().filter_map(|s| s.kcal).collect();
        if known.is_empty() {
            return None;
        }
        let average = known.iter().sum::<f64>() / known.len() as f64;
        let total = self
            .samples
            .iter()
            .map(|s| s.kcal.unwrap_or(average))
            .sum();
        Some(total)
    }
}

// ============================================================================
// Adaptive calculation
// ============================================================================

/// Typed, user-facing reasons the adaptive calculation can fail
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceCalculationError {
    #[error("No weight change data is available for the period")]
    NoWeightData,

    #[error("No dietary energy data is available for the period")]
    NoNutritionData,

    #[error("Neither weight nor dietary energy data is available for the period")]
    NoWeightOrNutritionData,

    #[error("The weight change over the period exceeds the energy consumed")]
    WeightChangeExceedsNutrition,
}

/// Adaptive maintenance: weight change vs dietary energy over an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adaptive {
    pub interval: HealthInterval,
    pub weight_change: WeightChange,
    pub dietary_energy: DietaryEnergy,
    pub kcal_per_day: Option<f64>,
    pub error: Option<MaintenanceCalculationError>,
}

impl Default for Adaptive {
    fn default() -> Self {
        let interval = HealthInterval::default();
        Self {
            interval,
            weight_change: WeightChange::default(),
            dietary_energy: DietaryEnergy::empty(interval),
            kcal_per_day: None,
            error: None,
        }
    }
}

impl Adaptive {
    /// Compute the adaptive maintenance value in kcal/day.
    ///
    /// `value = (dietary total - weight delta in kcal) / days`. A value at
    /// or below zero means more energy-equivalent was gained than consumed
    /// and is reported as a data-quality error rather than a result.
    pub fn calculate(
        weight_change: &WeightChange,
        dietary_energy: &DietaryEnergy,
        interval: HealthInterval,
    ) -> Result<f64, MaintenanceCalculationError> {
        let delta_kcal = weight_change.delta_energy_equivalent_kcal();
        let total_kcal = dietary_energy.total_kcal();

        let (delta_kcal, total_kcal) = match (delta_kcal, total_kcal) {
            (None, None) => return Err(MaintenanceCalculationError::NoWeightOrNutritionData),
            (None, Some(_)) => return Err(MaintenanceCalculationError::NoWeightData),
            (Some(_), None) => return Err(MaintenanceCalculationError::NoNutritionData),
            (Some(d), Some(t)) => (d, t),
        };

        let value = (total_kcal - delta_kcal) / f64::from(interval.number_of_days());
        if value <= 0.0 {
            return Err(MaintenanceCalculationError::WeightChangeExceedsNutrition);
        }
        Ok(value.max(0.0))
    }

    /// Recompute `kcal_per_day`/`error` from the current samples. Exactly
    /// one of the pair is set afterwards.
    pub fn recalculate(&mut self) {
        match Self::calculate(&self.weight_change, &self.dietary_energy, self.interval) {
            Ok(value) => {
                self.kcal_per_day = Some(value);
                self.error = None;
            }
            Err(error) => {
                self.kcal_per_day = None;
                self.error = Some(error);
            }
        }
    }
}

// ============================================================================
// Estimated + combined maintenance
// ============================================================================

/// Estimated maintenance: resting plus active energy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Estimated {
    pub resting_energy: RestingEnergy,
    pub active_energy: ActiveEnergy,
    pub kcal_per_day: Option<f64>,
}

impl Estimated {
    /// Recompute the additive estimate; either input missing clears it
    pub fn recalculate(&mut self) {
        self.kcal_per_day = match (self.resting_energy.kcal(), self.active_energy.kcal()) {
            (Some(resting), Some(active)) => Some(resting + active),
            _ => None,
        };
    }
}

/// Maintenance energy for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Maintenance {
    pub adaptive: Adaptive,
    pub estimated: Estimated,
    pub prefers_adaptive: bool,
}

impl Maintenance {
    /// The value shown to the user: the adaptive result when preferred and
    /// available, otherwise the estimate
    pub fn value_kcal(&self) -> Option<f64> {
        if self.prefers_adaptive {
            self.adaptive.kcal_per_day.or(self.estimated.kcal_per_day)
        } else {
            self.estimated.kcal_per_day
        }
    }
}
