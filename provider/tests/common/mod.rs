//! Shared mock collaborators for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use biometrics_provider::{
    CancellationToken, Day, DayStore, HealthOracle, OracleError, PlanOracle, Quantity,
    QuantityType, Settings, SettingsStore, StoreError,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Day store mock
// ============================================================================

#[derive(Default)]
pub struct MockDayStore {
    pub days: Mutex<BTreeMap<NaiveDate, Day>>,
    /// Dates passed to `save_day`, in call order
    pub save_calls: Mutex<Vec<NaiveDate>>,
    /// When set, cancel the token once this many saves have happened
    pub cancel_after_saves: Mutex<Option<(usize, CancellationToken)>>,
    /// Fail every fetch for these dates
    pub failing_dates: Mutex<Vec<NaiveDate>>,
    /// Artificial latency for each `save_day`, in milliseconds
    pub save_delay_ms: Mutex<Option<u64>>,
}

impl MockDayStore {
    pub fn with_days(days: Vec<Day>) -> Self {
        let store = Self::default();
        {
            let mut map = store.days.lock().unwrap();
            for day in days {
                map.insert(day.date, day);
            }
        }
        store
    }

    pub fn saved_dates(&self) -> Vec<NaiveDate> {
        self.save_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DayStore for MockDayStore {
    async fn fetch_or_create_day(&self, date: NaiveDate) -> Result<Day, StoreError> {
        if self.failing_dates.lock().unwrap().contains(&date) {
            return Err(StoreError::Unavailable(format!("no day for {date}")));
        }
        let mut days = self.days.lock().unwrap();
        Ok(days.entry(date).or_insert_with(|| Day::new(date)).clone())
    }

    async fn save_day(&self, day: &Day) -> Result<(), StoreError> {
        let delay = *self.save_delay_ms.lock().unwrap();
        if let Some(ms) = delay {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        }
        self.days.lock().unwrap().insert(day.date, day.clone());
        let mut calls = self.save_calls.lock().unwrap();
        calls.push(day.date);
        let count = calls.len();
        drop(calls);

        if let Some((after, token)) = self.cancel_after_saves.lock().unwrap().as_ref() {
            if count >= *after {
                token.cancel();
            }
        }
        Ok(())
    }

    async fn fetch_all_days(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        create_if_missing: bool,
    ) -> Result<BTreeMap<NaiveDate, Day>, StoreError> {
        let mut days = self.days.lock().unwrap();
        let mut result = BTreeMap::new();
        let mut current = from;
        while current <= to {
            if let Some(day) = days.get(&current) {
                result.insert(current, day.clone());
            } else if create_if_missing {
                let day = Day::new(current);
                days.insert(current, day.clone());
                result.insert(current, day);
            }
            current += Duration::days(1);
        }
        Ok(result)
    }

    async fn days_start_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self.days.lock().unwrap().keys().next().copied())
    }
}

// ============================================================================
// Health oracle mock
// ============================================================================

#[derive(Default)]
pub struct MockOracle {
    /// Same-day weight readings per date, in kg
    pub weights: Mutex<BTreeMap<NaiveDate, Vec<f64>>>,
    /// Platform dietary energy totals per date, in kcal
    pub dietary: Mutex<BTreeMap<NaiveDate, f64>>,
    /// Every oracle call fails while set
    pub failing: AtomicBool,
    pub resync_calls: AtomicUsize,
}

impl MockOracle {
    pub fn set_weight(&self, date: NaiveDate, kg: f64) {
        self.weights.lock().unwrap().insert(date, vec![kg]);
    }

    pub fn set_dietary(&self, date: NaiveDate, kcal: f64) {
        self.dietary.lock().unwrap().insert(date, kcal);
    }

    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check_failing(&self) -> Result<(), OracleError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(OracleError::PermissionDenied)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HealthOracle for MockOracle {
    async fn latest_quantity(
        &self,
        quantity_type: QuantityType,
        date: NaiveDate,
    ) -> Result<Option<Quantity>, OracleError> {
        self.check_failing()?;
        if quantity_type != QuantityType::Weight {
            return Ok(None);
        }
        let weights = self.weights.lock().unwrap();
        Ok(weights
            .range(..=date)
            .next_back()
            .and_then(|(reading_date, values)| {
                values.last().map(|value| Quantity {
                    value: *value,
                    date: Some(*reading_date),
                })
            }))
    }

    async fn daily_quantities(
        &self,
        quantity_type: QuantityType,
        date: NaiveDate,
    ) -> Result<Option<Vec<Quantity>>, OracleError> {
        self.check_failing()?;
        if quantity_type != QuantityType::Weight {
            return Ok(None);
        }
        let weights = self.weights.lock().unwrap();
        Ok(weights.get(&date).map(|values| {
            values
                .iter()
                .map(|value| Quantity { value: *value, date: Some(date) })
                .collect()
        }))
    }

    async fn total_dietary_energy(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<HashMap<i64, f64>>, OracleError> {
        self.check_failing()?;
        let dietary = self.dietary.lock().unwrap();
        let mut totals = HashMap::new();
        for (date, kcal) in dietary.range(from..=to) {
            totals.insert((*date - from).num_days(), *kcal);
        }
        Ok(if totals.is_empty() { None } else { Some(totals) })
    }

    async fn resync(&self) -> Result<(), OracleError> {
        self.check_failing()?;
        self.resync_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Settings + plan mocks
// ============================================================================

#[derive(Default)]
pub struct MockSettings {
    pub settings: Settings,
}

impl SettingsStore for MockSettings {
    fn settings(&self) -> Settings {
        self.settings
    }
}

pub struct MockPlans {
    pub weight_dependent: bool,
}

#[async_trait]
impl PlanOracle for MockPlans {
    async fn is_plan_weight_dependent(&self, _date: NaiveDate) -> bool {
        self.weight_dependent
    }
}
