//! Latest-value accumulator for history scans
//!
//! The history recalculation folds over dates oldest to newest, carrying
//! the most recent known value of each attribute type. A day lacking a raw
//! input borrows from this accumulator; the accumulator is updated only
//! after that day's own recalculation completes, so a day never feeds its
//! own derivation.

use chrono::NaiveDate;

use biometrics_core::{
    Age, Height, HealthDetails, LeanBodyMass, ReferenceValues, Sex, SexRecord, Weight,
};

/// Most recent known value per attribute type, each tagged with the date it
/// was observed on
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LatestHealthDetails {
    pub sex: Option<(NaiveDate, Sex)>,
    pub age_years: Option<(NaiveDate, u32)>,
    pub weight_kg: Option<(NaiveDate, f64)>,
    pub height_cm: Option<(NaiveDate, f64)>,
    pub lean_body_mass_kg: Option<(NaiveDate, f64)>,
    pub fat_percentage: Option<(NaiveDate, f64)>,
}

impl LatestHealthDetails {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot usable as recalculation fallbacks
    pub fn reference_values(&self) -> ReferenceValues {
        ReferenceValues {
            sex: self.sex.map(|(_, v)| v),
            age_years: self.age_years.map(|(_, v)| v),
            weight_kg: self.weight_kg.map(|(_, v)| v),
            height_cm: self.height_cm.map(|(_, v)| v),
            lean_body_mass_kg: self.lean_body_mass_kg.map(|(_, v)| v),
            fat_percentage: self.fat_percentage.map(|(_, v)| v),
        }
    }

    /// Record every attribute the finished day has a value for. Call this
    /// only after the day's recalculation is complete.
    pub fn update_from(&mut self, details: &HealthDetails) {
        let date = details.date;
        if let Some(sex) = details.sex.as_ref().and_then(SexRecord::sex) {
            self.sex = Some((date, sex));
        }
        if let Some(years) = details.age.as_ref().and_then(Age::years) {
            self.age_years = Some((date, years));
        }
        if let Some(kg) = details.weight.as_ref().and_then(Weight::kg) {
            self.weight_kg = Some((date, kg));
        }
        if let Some(cm) = details.height.as_ref().and_then(Height::cm) {
            self.height_cm = Some((date, cm));
        }
        if let Some(kg) = details.lean_body_mass.as_ref().and_then(LeanBodyMass::kg) {
            self.lean_body_mass_kg = Some((date, kg));
        }
        if let Some(fat) = details.fat_percentage {
            self.fat_percentage = Some((date, fat));
        }
    }
}
