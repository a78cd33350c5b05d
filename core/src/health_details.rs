//! Per-day health details aggregate
//!
//! One `HealthDetails` exists per calendar date. `recalculate` brings every
//! derived field into consistency after raw edits, in strict dependency
//! order: age, then lean body mass, then resting energy, then active
//! energy, then the estimated maintenance. Missing inputs always degrade to
//! `None`; nothing in here errors or performs I/O.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::attributes::{
    age_in_years, ActiveEnergy, Age, Height, LeanBodyMass, PregnancyStatus, RestingEnergy, Sex,
    SexRecord, Weight,
};
use crate::equations::EquationInputs;
use crate::maintenance::Maintenance;

/// Latest-prior attribute values carried forward during a history scan.
///
/// A day missing a raw input borrows the most recent prior value instead of
/// degrading, without mutating its own stored attributes. Same-day values
/// must never appear here while that day recalculates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReferenceValues {
    pub sex: Option<Sex>,
    pub age_years: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub lean_body_mass_kg: Option<f64>,
    pub fat_percentage: Option<f64>,
}

/// One day's full attribute snapshot, the root aggregate of the day record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDetails {
    /// Calendar-day identity, immutable
    pub date: NaiveDate,
    pub maintenance: Option<Maintenance>,
    pub weight: Option<Weight>,
    pub lean_body_mass: Option<LeanBodyMass>,
    pub height: Option<Height>,
    pub age: Option<Age>,
    pub sex: Option<SexRecord>,
    /// Body fat percentage; valid strictly between 0 and 100
    pub fat_percentage: Option<f64>,
    pub pregnancy_status: Option<PregnancyStatus>,
    pub is_smoker: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl HealthDetails {
    /// An empty snapshot for `date`
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            maintenance: None,
            weight: None,
            lean_body_mass: None,
            height: None,
            age: None,
            sex: None,
            fat_percentage: None,
            pregnancy_status: None,
            is_smoker: None,
            updated_at: Utc::now(),
        }
    }

    /// Content equality ignoring `date` and `updated_at`; the persist layer
    /// uses this to skip no-op saves.
    pub fn matches(&self, other: &Self) -> bool {
        self.maintenance == other.maintenance
            && self.weight == other.weight
            && self.lean_body_mass == other.lean_body_mass
            && self.height == other.height
            && self.age == other.age
            && self.sex == other.sex
            && self.fat_percentage == other.fat_percentage
            && self.pregnancy_status == other.pregnancy_status
            && self.is_smoker == other.is_smoker
    }

    /// Mark as modified now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // Resolved inputs: own value first, latest-prior fallback second.

    fn resolved_sex(&self, reference: &ReferenceValues) -> Option<Sex> {
        self.sex.as_ref().and_then(SexRecord::sex).or(reference.sex)
    }

    fn resolved_age_years(&self, reference: &ReferenceValues) -> Option<u32> {
        self.age.as_ref().and_then(Age::years).or(reference.age_years)
    }

    fn resolved_weight_kg(&self, reference: &ReferenceValues) -> Option<f64> {
        self.weight.as_ref().and_then(Weight::kg).or(reference.weight_kg)
    }

    fn resolved_height_cm(&self, reference: &ReferenceValues) -> Option<f64> {
        self.height.as_ref().and_then(Height::cm).or(reference.height_cm)
    }

    fn resolved_fat_percentage(&self, reference: &ReferenceValues) -> Option<f64> {
        self.fat_percentage.or(reference.fat_percentage)
    }

    fn resolved_lean_body_mass_kg(&self, reference: &ReferenceValues) -> Option<f64> {
        self.lean_body_mass
            .as_ref()
            .and_then(LeanBodyMass::kg)
            .or(reference.lean_body_mass_kg)
    }

    /// Bring all derived fields into consistency, in dependency order.
    /// Idempotent: a second call with no intervening mutation is a no-op.
    pub fn recalculate(&mut self, reference: &ReferenceValues, today: NaiveDate) {
        self.recalculate_age(today);
        self.recalculate_lean_body_mass(reference);
        self.recalculate_resting_energy(reference);
        self.recalculate_active_energy();
        if let Some(maintenance) = &mut self.maintenance {
            maintenance.estimated.recalculate();
        }
    }

    fn recalculate_age(&mut self, today: NaiveDate) {
        if let Some(Age::BirthDate { date, years }) = &mut self.age {
            *years = Some(age_in_years(*date, today));
        }
    }

    fn recalculate_lean_body_mass(&mut self, reference: &ReferenceValues) {
        let sex = self.resolved_sex(reference);
        let weight_kg = self.resolved_weight_kg(reference);
        let height_cm = self.resolved_height_cm(reference);
        let fat_percentage = self.resolved_fat_percentage(reference);

        match &mut self.lean_body_mass {
            Some(LeanBodyMass::Equation { equation, kg }) => {
                let inputs = EquationInputs {
                    sex,
                    weight_kg,
                    height_cm,
                    ..Default::default()
                };
                *kg = equation.calculate(&inputs);
            }
            Some(LeanBodyMass::FatPercentage { kg }) => {
                *kg = match (fat_percentage, weight_kg) {
                    (Some(fat), Some(weight)) if fat > 0.0 && fat < 100.0 => {
                        Some(weight * (100.0 - fat) / 100.0)
                    }
                    _ => None,
                };
            }
            // Platform and user-entered values pass through untouched
            _ => {}
        }
    }

    fn recalculate_resting_energy(&mut self, reference: &ReferenceValues) {
        let inputs = EquationInputs {
            sex: self.resolved_sex(reference),
            age_years: self.resolved_age_years(reference),
            weight_kg: self.resolved_weight_kg(reference),
            height_cm: self.resolved_height_cm(reference),
            lean_body_mass_kg: self.resolved_lean_body_mass_kg(reference),
        };
        if let Some(maintenance) = &mut self.maintenance {
            if let RestingEnergy::Equation { equation, kcal } =
                &mut maintenance.estimated.resting_energy
            {
                *kcal = equation.calculate(&inputs);
            }
        }
    }

    fn recalculate_active_energy(&mut self) {
        if let Some(maintenance) = &mut self.maintenance {
            let resting_kcal = maintenance.estimated.resting_energy.kcal();
            if let ActiveEnergy::ActivityLevel { level, kcal } =
                &mut maintenance.estimated.active_energy
            {
                // The increment above resting, not the scaled total
                *kcal = resting_kcal.map(|resting| resting * level.multiplier() - resting);
            }
        }
    }
}
