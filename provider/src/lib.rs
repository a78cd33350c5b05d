//! Biometrics provider library
//!
//! Orchestration layer over the pure `biometrics-core` domain: collaborator
//! traits for the backend day store and the external health-platform
//! oracle, the sample fill pipeline, and the provider that sequences saves,
//! full-history recalculation, and resyncs with cooperative cancellation.

pub mod cancel;
pub mod config;
pub mod error;
pub mod latest;
pub mod provider;
pub mod sampling;
pub mod settings;
pub mod stores;

pub use cancel::CancellationToken;
pub use config::ProviderConfig;
pub use error::{OracleError, ProviderError, ProviderResult, StoreError};
pub use latest::LatestHealthDetails;
pub use provider::{recalculate_all_days, HealthProvider};
pub use sampling::SampleFiller;
pub use settings::{DailyMeasurementPolicy, KeyValueCache, Settings};
pub use stores::{Day, DayStore, HealthOracle, PlanOracle, Quantity, QuantityType, SettingsStore};
