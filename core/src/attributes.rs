//! Health-attribute value objects
//!
//! Every attribute is a tagged union over its source (health platform,
//! equation, user-entered, derived), so that each variant carries only the
//! fields that are legal for that source. Derived fields are always
//! `Option`: missing inputs degrade to `None`, never to an error.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::equations::{LeanBodyMassEquation, RestingEnergyEquation};

/// Biological sex used by the equation library.
///
/// `Other` is stored faithfully but is not a usable equation input: any
/// equation that declares sex resolves to `None` for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
    Other,
}

/// Activity level scaling resting energy into total expenditure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
}

impl ActivityLevel {
    /// Get the scale factor applied to resting energy
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "Very hard exercise or physical job",
        }
    }
}

/// Pregnancy status, used for downstream daily-value selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyStatus {
    #[default]
    NotSet,
    NotPregnant,
    Pregnant,
    Lactating,
}

/// Attribute kinds, used as keys of the latest-value map and as equation
/// parameter descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    Sex,
    Age,
    Weight,
    Height,
    LeanBodyMass,
    FatPercentage,
    RestingEnergy,
    ActiveEnergy,
    Maintenance,
}

// ============================================================================
// Tagged attribute records
// ============================================================================

/// Recorded biological sex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SexRecord {
    HealthPlatform { sex: Option<Sex> },
    UserEntered { sex: Sex },
}

impl SexRecord {
    pub fn sex(&self) -> Option<Sex> {
        match self {
            SexRecord::HealthPlatform { sex } => *sex,
            SexRecord::UserEntered { sex } => Some(*sex),
        }
    }
}

/// Recorded age: either stored years or derived from a birth date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Age {
    HealthPlatform {
        years: Option<u32>,
    },
    /// Derived: `years` is recomputed from `date` on every recalculation
    BirthDate {
        date: NaiveDate,
        years: Option<u32>,
    },
    UserEntered {
        years: u32,
    },
}

impl Age {
    pub fn years(&self) -> Option<u32> {
        match self {
            Age::HealthPlatform { years } => *years,
            Age::BirthDate { years, .. } => *years,
            Age::UserEntered { years } => Some(*years),
        }
    }
}

/// Calendar-aware age in whole years at `today`.
///
/// Birth dates in the future yield 0.
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    if birth_date > today {
        return 0;
    }
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Recorded body weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Weight {
    HealthPlatform {
        kg: Option<f64>,
        /// Whether same-day platform entries were averaged or the latest kept
        is_daily_average: bool,
    },
    UserEntered {
        kg: f64,
    },
}

impl Weight {
    pub fn kg(&self) -> Option<f64> {
        match self {
            Weight::HealthPlatform { kg, .. } => *kg,
            Weight::UserEntered { kg } => Some(*kg),
        }
    }
}

/// Recorded height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Height {
    HealthPlatform { cm: Option<f64> },
    UserEntered { cm: f64 },
}

impl Height {
    pub fn cm(&self) -> Option<f64> {
        match self {
            Height::HealthPlatform { cm } => *cm,
            Height::UserEntered { cm } => Some(*cm),
        }
    }
}

/// Recorded or derived lean body mass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LeanBodyMass {
    HealthPlatform {
        kg: Option<f64>,
    },
    /// Derived from the selected equation; `kg` is cleared when any
    /// required input is missing
    Equation {
        equation: LeanBodyMassEquation,
        kg: Option<f64>,
    },
    /// Derived from fat percentage: `weight * (100 - fat%) / 100`
    FatPercentage {
        kg: Option<f64>,
    },
    UserEntered {
        kg: f64,
    },
}

impl LeanBodyMass {
    pub fn kg(&self) -> Option<f64> {
        match self {
            LeanBodyMass::HealthPlatform { kg } => *kg,
            LeanBodyMass::Equation { kg, .. } => *kg,
            LeanBodyMass::FatPercentage { kg } => *kg,
            LeanBodyMass::UserEntered { kg } => Some(*kg),
        }
    }
}

/// Recorded or derived resting energy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RestingEnergy {
    HealthPlatform {
        kcal: Option<f64>,
    },
    Equation {
        equation: RestingEnergyEquation,
        kcal: Option<f64>,
    },
    UserEntered {
        kcal: f64,
    },
}

impl Default for RestingEnergy {
    fn default() -> Self {
        RestingEnergy::Equation {
            equation: RestingEnergyEquation::default(),
            kcal: None,
        }
    }
}

impl RestingEnergy {
    pub fn kcal(&self) -> Option<f64> {
        match self {
            RestingEnergy::HealthPlatform { kcal } => *kcal,
            RestingEnergy::Equation { kcal, .. } => *kcal,
            RestingEnergy::UserEntered { kcal } => Some(*kcal),
        }
    }
}

/// Recorded or derived active energy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ActiveEnergy {
    HealthPlatform {
        kcal: Option<f64>,
    },
    /// Derived: the increment above resting energy implied by the level,
    /// `resting * multiplier - resting`
    ActivityLevel {
        level: ActivityLevel,
        kcal: Option<f64>,
    },
    UserEntered {
        kcal: f64,
    },
}

impl Default for ActiveEnergy {
    fn default() -> Self {
        ActiveEnergy::ActivityLevel {
            level: ActivityLevel::default(),
            kcal: None,
        }
    }
}

impl ActiveEnergy {
    pub fn kcal(&self) -> Option<f64> {
        match self {
            ActiveEnergy::HealthPlatform { kcal } => *kcal,
            ActiveEnergy::ActivityLevel { kcal, .. } => *kcal,
            ActiveEnergy::UserEntered { kcal } => Some(*kcal),
        }
    }
}
