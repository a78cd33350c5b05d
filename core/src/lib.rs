//! Biometrics core library
//!
//! Pure domain layer for the settings/biometrics module of a
//! nutrition-tracking application: unit primitives, health-attribute value
//! objects, the resting-energy/lean-body-mass equation library, the per-day
//! `HealthDetails` aggregate, and the adaptive maintenance-energy
//! calculator. No I/O lives in this crate.

pub mod attributes;
pub mod equations;
pub mod health_details;
pub mod maintenance;
pub mod units;

// Re-export commonly used items
pub use attributes::*;
pub use equations::*;
pub use health_details::*;
pub use maintenance::*;
pub use units::*;
