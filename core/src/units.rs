//! Unit conversion and normalization module
//!
//! Provides type-safe unit handling with conversion at the boundaries.
//! All storage and calculation uses canonical units internally: kcal for
//! energy, kg for body mass, cm for height. Display units are converted on
//! input/output, never inside the calculation pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilograms per pound (exact, by definition).
pub const KG_PER_POUND: f64 = 0.453_592_37;

/// Energy equivalent of one pound of body fat, in kcal.
pub const KCAL_PER_POUND_OF_FAT: f64 = 3500.0;

/// Convert a body-mass delta in kg to its energy equivalent in kcal.
///
/// Uses the 3500 kcal/lb convention: `delta_kg * 3500 / 0.45359237`.
/// A negative delta (weight lost) yields a negative kcal equivalent.
pub fn kcal_equivalent_of_kg(delta_kg: f64) -> f64 {
    delta_kg * KCAL_PER_POUND_OF_FAT / KG_PER_POUND
}

// ============================================================================
// Body Mass Units
// ============================================================================

/// Body-mass unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyMassUnit {
    #[default]
    Kg,
    Lbs,
    Stone,
}

impl BodyMassUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            BodyMassUnit::Kg => value,
            BodyMassUnit::Lbs => value * KG_PER_POUND,
            BodyMassUnit::Stone => value * 6.35029,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            BodyMassUnit::Kg => kg,
            BodyMassUnit::Lbs => kg / KG_PER_POUND,
            BodyMassUnit::Stone => kg / 6.35029,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            BodyMassUnit::Kg => "kg",
            BodyMassUnit::Lbs => "lbs",
            BodyMassUnit::Stone => "st",
        }
    }
}

impl fmt::Display for BodyMassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for BodyMassUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(BodyMassUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(BodyMassUnit::Lbs),
            "st" | "stone" | "stones" => Ok(BodyMassUnit::Stone),
            _ => Err(format!("Unknown body mass unit: {}", s)),
        }
    }
}

// ============================================================================
// Height Units
// ============================================================================

/// Height unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    Meters,
    FeetInches, // Stored as total inches
}

impl HeightUnit {
    /// Convert from this unit to centimeters
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            HeightUnit::Cm => value,
            HeightUnit::Meters => value * 100.0,
            HeightUnit::FeetInches => value * 2.54,
        }
    }

    /// Convert from centimeters to this unit
    pub fn from_cm(&self, cm: f64) -> f64 {
        match self {
            HeightUnit::Cm => cm,
            HeightUnit::Meters => cm / 100.0,
            HeightUnit::FeetInches => cm / 2.54,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::Meters => "m",
            HeightUnit::FeetInches => "ft/in",
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for HeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(HeightUnit::Cm),
            "m" | "meter" | "meters" => Ok(HeightUnit::Meters),
            "ft" | "ft/in" | "feet" | "feet/inches" => Ok(HeightUnit::FeetInches),
            _ => Err(format!("Unknown height unit: {}", s)),
        }
    }
}

// ============================================================================
// Energy Units
// ============================================================================

/// Energy unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnergyUnit {
    #[default]
    Kcal,
    Kj,
}

impl EnergyUnit {
    /// Convert from this unit to kcal
    pub fn to_kcal(&self, value: f64) -> f64 {
        match self {
            EnergyUnit::Kcal => value,
            EnergyUnit::Kj => value / 4.184,
        }
    }

    /// Convert from kcal to this unit
    pub fn from_kcal(&self, kcal: f64) -> f64 {
        match self {
            EnergyUnit::Kcal => kcal,
            EnergyUnit::Kj => kcal * 4.184,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            EnergyUnit::Kcal => "kcal",
            EnergyUnit::Kj => "kJ",
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for EnergyUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kcal" | "calorie" | "calories" => Ok(EnergyUnit::Kcal),
            "kj" | "kilojoule" | "kilojoules" => Ok(EnergyUnit::Kj),
            _ => Err(format!("Unknown energy unit: {}", s)),
        }
    }
}

// ============================================================================
// User Unit Preferences
// ============================================================================

/// Complete display-unit preferences for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UnitPreferences {
    pub energy: EnergyUnit,
    pub body_mass: BodyMassUnit,
    pub height: HeightUnit,
}

impl UnitPreferences {
    /// Metric preferences (canonical units)
    pub fn metric() -> Self {
        Self {
            energy: EnergyUnit::Kcal,
            body_mass: BodyMassUnit::Kg,
            height: HeightUnit::Cm,
        }
    }

    /// Imperial preferences (US units)
    pub fn imperial() -> Self {
        Self {
            energy: EnergyUnit::Kcal,
            body_mass: BodyMassUnit::Lbs,
            height: HeightUnit::FeetInches,
        }
    }
}

// ============================================================================
// Height Display Helper
// ============================================================================

/// Represents height in feet and inches for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeetInches {
    pub feet: i32,
    pub inches: f64,
}

impl FeetInches {
    /// Create from total inches
    pub fn from_total_inches(total_inches: f64) -> Self {
        let feet = (total_inches / 12.0).floor() as i32;
        let inches = total_inches % 12.0;
        Self { feet, inches }
    }

    /// Convert to total inches
    pub fn to_total_inches(&self) -> f64 {
        (self.feet as f64 * 12.0) + self.inches
    }

    /// Create from centimeters
    pub fn from_cm(cm: f64) -> Self {
        Self::from_total_inches(cm / 2.54)
    }

    /// Convert to centimeters
    pub fn to_cm(&self) -> f64 {
        self.to_total_inches() * 2.54
    }
}

impl fmt::Display for FeetInches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{:.0}\"", self.feet, self.inches)
    }
}
