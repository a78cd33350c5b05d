//! Equation library for resting energy and lean body mass
//!
//! Pure, stateless functions selected by enum tag. Each equation declares
//! the parameter set it requires; `calculate` returns `None` whenever any
//! declared parameter is missing, never panicking and never erroring.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attributes::{MeasurementType, Sex};

/// Inputs offered to an equation. All optional; an equation only reads the
/// parameters it declares.
#[derive(Debug, Clone, Copy, Default)]
pub struct EquationInputs {
    pub sex: Option<Sex>,
    pub age_years: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub lean_body_mass_kg: Option<f64>,
}

impl EquationInputs {
    /// Resolve sex into the male/female dichotomy the published formulas
    /// use. `Other` is not a usable input.
    fn binary_sex(&self) -> Option<Sex> {
        match self.sex {
            Some(Sex::Male) => Some(Sex::Male),
            Some(Sex::Female) => Some(Sex::Female),
            _ => None,
        }
    }
}

// ============================================================================
// Resting Energy
// ============================================================================

/// Named resting-energy equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RestingEnergyEquation {
    /// Katch-McArdle (1996), lean body mass only
    KatchMcardle,
    /// Cunningham (1980), lean body mass only
    Cunningham,
    /// Schofield (1985), age-banded weight equations, no height
    Schofield,
    /// Henry "Oxford" (2005), age-banded weight equations, no height
    HenryOxford,
    /// Mifflin-St Jeor (1990)
    #[default]
    MifflinStJeor,
    /// Roza-Shizgal (1984) revision of Harris-Benedict
    RozaShizgal,
    /// Harris-Benedict (1919), original coefficients
    HarrisBenedict,
}

impl RestingEnergyEquation {
    pub const ALL: [RestingEnergyEquation; 7] = [
        RestingEnergyEquation::KatchMcardle,
        RestingEnergyEquation::Cunningham,
        RestingEnergyEquation::Schofield,
        RestingEnergyEquation::HenryOxford,
        RestingEnergyEquation::MifflinStJeor,
        RestingEnergyEquation::RozaShizgal,
        RestingEnergyEquation::HarrisBenedict,
    ];

    /// Parameters this equation requires
    pub fn params(&self) -> &'static [MeasurementType] {
        match self {
            RestingEnergyEquation::KatchMcardle | RestingEnergyEquation::Cunningham => {
                &[MeasurementType::LeanBodyMass]
            }
            RestingEnergyEquation::Schofield | RestingEnergyEquation::HenryOxford => &[
                MeasurementType::Sex,
                MeasurementType::Age,
                MeasurementType::Weight,
            ],
            RestingEnergyEquation::MifflinStJeor
            | RestingEnergyEquation::RozaShizgal
            | RestingEnergyEquation::HarrisBenedict => &[
                MeasurementType::Sex,
                MeasurementType::Age,
                MeasurementType::Weight,
                MeasurementType::Height,
            ],
        }
    }

    /// Publication year, for display alongside the name
    pub fn year(&self) -> u32 {
        match self {
            RestingEnergyEquation::KatchMcardle => 1996,
            RestingEnergyEquation::Cunningham => 1980,
            RestingEnergyEquation::Schofield => 1985,
            RestingEnergyEquation::HenryOxford => 2005,
            RestingEnergyEquation::MifflinStJeor => 1990,
            RestingEnergyEquation::RozaShizgal => 1984,
            RestingEnergyEquation::HarrisBenedict => 1919,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RestingEnergyEquation::KatchMcardle => "Katch-McArdle",
            RestingEnergyEquation::Cunningham => "Cunningham",
            RestingEnergyEquation::Schofield => "Schofield",
            RestingEnergyEquation::HenryOxford => "Henry (Oxford)",
            RestingEnergyEquation::MifflinStJeor => "Mifflin-St Jeor",
            RestingEnergyEquation::RozaShizgal => "Roza-Shizgal",
            RestingEnergyEquation::HarrisBenedict => "Harris-Benedict",
        }
    }

    /// Resting energy in kcal/day, or `None` if any declared parameter is
    /// missing.
    pub fn calculate(&self, inputs: &EquationInputs) -> Option<f64> {
        match self {
            RestingEnergyEquation::KatchMcardle => {
                let lbm = inputs.lean_body_mass_kg?;
                Some(370.0 + 21.6 * lbm)
            }
            RestingEnergyEquation::Cunningham => {
                let lbm = inputs.lean_body_mass_kg?;
                Some(500.0 + 22.0 * lbm)
            }
            RestingEnergyEquation::Schofield => {
                let sex = inputs.binary_sex()?;
                let age = inputs.age_years?;
                let w = inputs.weight_kg?;
                Some(schofield(sex, age, w))
            }
            RestingEnergyEquation::HenryOxford => {
                let sex = inputs.binary_sex()?;
                let age = inputs.age_years?;
                let w = inputs.weight_kg?;
                Some(henry_oxford(sex, age, w))
            }
            RestingEnergyEquation::MifflinStJeor => {
                let sex = inputs.binary_sex()?;
                let age = inputs.age_years?;
                let w = inputs.weight_kg?;
                let h = inputs.height_cm?;
                let base = 10.0 * w + 6.25 * h - 5.0 * age as f64;
                Some(match sex {
                    Sex::Male => base + 5.0,
                    _ => base - 161.0,
                })
            }
            RestingEnergyEquation::RozaShizgal => {
                let sex = inputs.binary_sex()?;
                let age = inputs.age_years?;
                let w = inputs.weight_kg?;
                let h = inputs.height_cm?;
                Some(match sex {
                    Sex::Male => 88.362 + 13.397 * w + 4.799 * h - 5.677 * age as f64,
                    _ => 447.593 + 9.247 * w + 3.098 * h - 4.330 * age as f64,
                })
            }
            RestingEnergyEquation::HarrisBenedict => {
                let sex = inputs.binary_sex()?;
                let age = inputs.age_years?;
                let w = inputs.weight_kg?;
                let h = inputs.height_cm?;
                Some(match sex {
                    Sex::Male => 66.4730 + 13.7516 * w + 5.0033 * h - 6.7550 * age as f64,
                    _ => 655.0955 + 9.5634 * w + 1.8496 * h - 4.6756 * age as f64,
                })
            }
        }
    }
}

impl fmt::Display for RestingEnergyEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.year())
    }
}

/// Schofield (1985) age-banded equations, kcal/day
fn schofield(sex: Sex, age_years: u32, weight_kg: f64) -> f64 {
    let w = weight_kg;
    match sex {
        Sex::Male => match age_years {
            0..=2 => 59.512 * w - 30.4,
            3..=9 => 22.706 * w + 504.3,
            10..=17 => 17.686 * w + 658.2,
            18..=29 => 15.057 * w + 692.2,
            30..=59 => 11.472 * w + 873.1,
            _ => 11.711 * w + 587.7,
        },
        _ => match age_years {
            0..=2 => 58.317 * w - 31.1,
            3..=9 => 20.315 * w + 485.9,
            10..=17 => 13.384 * w + 692.6,
            18..=29 => 14.818 * w + 486.6,
            30..=59 => 8.126 * w + 845.6,
            _ => 9.082 * w + 658.5,
        },
    }
}

/// Henry "Oxford" (2005) age-banded equations, kcal/day
fn henry_oxford(sex: Sex, age_years: u32, weight_kg: f64) -> f64 {
    let w = weight_kg;
    match sex {
        Sex::Male => match age_years {
            0..=2 => 61.0 * w - 33.7,
            3..=9 => 23.3 * w + 514.0,
            10..=17 => 18.4 * w + 581.0,
            18..=29 => 16.0 * w + 545.0,
            30..=59 => 14.2 * w + 593.0,
            _ => 13.5 * w + 514.0,
        },
        _ => match age_years {
            0..=2 => 58.9 * w - 23.1,
            3..=9 => 20.1 * w + 507.0,
            10..=17 => 11.1 * w + 761.0,
            18..=29 => 13.1 * w + 558.0,
            30..=59 => 9.74 * w + 694.0,
            _ => 10.1 * w + 569.0,
        },
    }
}

// ============================================================================
// Lean Body Mass
// ============================================================================

/// Named lean-body-mass equations; all require sex, weight and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeanBodyMassEquation {
    /// Boer (1984)
    #[default]
    Boer,
    /// James (1976)
    James,
    /// Hume (1966)
    Hume,
}

impl LeanBodyMassEquation {
    pub const ALL: [LeanBodyMassEquation; 3] = [
        LeanBodyMassEquation::Boer,
        LeanBodyMassEquation::James,
        LeanBodyMassEquation::Hume,
    ];

    /// Parameters this equation requires
    pub fn params(&self) -> &'static [MeasurementType] {
        &[
            MeasurementType::Sex,
            MeasurementType::Weight,
            MeasurementType::Height,
        ]
    }

    pub fn year(&self) -> u32 {
        match self {
            LeanBodyMassEquation::Boer => 1984,
            LeanBodyMassEquation::James => 1976,
            LeanBodyMassEquation::Hume => 1966,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LeanBodyMassEquation::Boer => "Boer",
            LeanBodyMassEquation::James => "James",
            LeanBodyMassEquation::Hume => "Hume",
        }
    }

    /// Lean body mass in kg, or `None` if any declared parameter is missing.
    pub fn calculate(&self, inputs: &EquationInputs) -> Option<f64> {
        let sex = inputs.binary_sex()?;
        let w = inputs.weight_kg?;
        let h = inputs.height_cm?;
        let lbm = match (self, sex) {
            (LeanBodyMassEquation::Boer, Sex::Male) => 0.407 * w + 0.267 * h - 19.2,
            (LeanBodyMassEquation::Boer, _) => 0.252 * w + 0.473 * h - 48.3,
            (LeanBodyMassEquation::James, Sex::Male) => 1.1 * w - 128.0 * (w / h) * (w / h),
            (LeanBodyMassEquation::James, _) => 1.07 * w - 148.0 * (w / h) * (w / h),
            (LeanBodyMassEquation::Hume, Sex::Male) => 0.32810 * w + 0.33929 * h - 29.5336,
            (LeanBodyMassEquation::Hume, _) => 0.29569 * w + 0.41813 * h - 43.2933,
        };
        Some(lbm)
    }
}

impl fmt::Display for LeanBodyMassEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.year())
    }
}
