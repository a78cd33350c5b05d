//! Sample fill pipeline
//!
//! Populates `WeightChange` endpoints and `DietaryEnergy` slots from the
//! health-platform oracle and the backend day store before the adaptive
//! calculation runs. A failed fetch for one date degrades that slot to
//! `None` and the pass continues; only setup-level failures propagate.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::warn;

use biometrics_core::{
    DietaryEnergy, DietaryEnergySampleType, HealthInterval, Weight, WeightChange, WeightSample,
    WeightSampleSource,
};

use crate::error::ProviderResult;
use crate::settings::{DailyMeasurementPolicy, Settings};
use crate::stores::{DayStore, HealthOracle, QuantityType};

/// Fills maintenance samples from the oracle and the backend day store
pub struct SampleFiller<'a> {
    oracle: &'a dyn HealthOracle,
    store: &'a dyn DayStore,
    settings: Settings,
}

impl<'a> SampleFiller<'a> {
    pub fn new(oracle: &'a dyn HealthOracle, store: &'a dyn DayStore, settings: Settings) -> Self {
        Self { oracle, store, settings }
    }

    /// Populate both endpoints of a weight change for the interval ending
    /// at `date`.
    pub async fn fill_weight_change(
        &self,
        change: &mut WeightChange,
        date: NaiveDate,
        interval: HealthInterval,
    ) {
        self.fill_weight_sample(&mut change.current, date).await;
        self.fill_weight_sample(&mut change.previous, interval.start_date(date))
            .await;
    }

    async fn fill_weight_sample(&self, sample: &mut WeightSample, date: NaiveDate) {
        match sample.source {
            WeightSampleSource::HealthPlatform => {
                sample.is_daily_average =
                    self.settings.weight_policy == DailyMeasurementPolicy::Average;
                if let Some(interval) = sample.moving_average_interval {
                    // One point query per window day; missing days are left
                    // out of the average rather than failing the sample.
                    let mut values = BTreeMap::new();
                    for offset in 0..interval.number_of_days() {
                        let day = date - Duration::days(i64::from(offset));
                        if let Some(kg) = self.platform_weight_for(day).await {
                            values.insert(offset, kg);
                        }
                    }
                    sample.moving_average_kg = Some(values);
                    sample.recompute_moving_average();
                } else {
                    sample.kg = self.platform_weight_for(date).await;
                }
            }
            WeightSampleSource::UserEntered => {
                // Backend fallback: the weight stored on that day's record
                sample.kg = match self.store.fetch_or_create_day(date).await {
                    Ok(day) => day.health_details.weight.as_ref().and_then(Weight::kg),
                    Err(error) => {
                        warn!(%date, %error, "weight sample fetch failed, leaving empty");
                        None
                    }
                };
            }
        }
    }

    /// One platform weight reading for `date`, honoring the daily
    /// aggregation policy. Oracle failures degrade to `None`.
    async fn platform_weight_for(&self, date: NaiveDate) -> Option<f64> {
        match self.settings.weight_policy {
            DailyMeasurementPolicy::Average => {
                match self.oracle.daily_quantities(QuantityType::Weight, date).await {
                    Ok(Some(quantities)) if !quantities.is_empty() => {
                        let sum: f64 = quantities.iter().map(|q| q.value).sum();
                        Some(sum / quantities.len() as f64)
                    }
                    Ok(_) => None,
                    Err(error) => {
                        warn!(%date, %error, "daily weight query failed, leaving empty");
                        None
                    }
                }
            }
            DailyMeasurementPolicy::Last => {
                match self.oracle.latest_quantity(QuantityType::Weight, date).await {
                    Ok(quantity) => quantity.map(|q| q.value),
                    Err(error) => {
                        warn!(%date, %error, "latest weight query failed, leaving empty");
                        None
                    }
                }
            }
        }
    }

    /// Populate the per-day dietary energy slots for the interval ending at
    /// `date` (exclusive), then gap-fill unconditionally so the total is
    /// computable whenever at least one sample is known.
    pub async fn fill_dietary_energy(
        &self,
        energy: &mut DietaryEnergy,
        date: NaiveDate,
        interval: HealthInterval,
    ) -> ProviderResult<()> {
        let days = interval.number_of_days() as usize;
        // Invariant: one sample slot per interval day
        energy.samples.resize_with(days, Default::default);
        let start = interval.start_date(date);

        self.fill_platform_dietary_range(energy, start).await;

        for (offset, sample) in energy.samples.iter_mut().enumerate() {
            if sample.sample_type != DietaryEnergySampleType::LoggedBackend {
                continue;
            }
            let day_date = start + Duration::days(offset as i64);
            sample.kcal = match self.store.fetch_or_create_day(day_date).await {
                Ok(day) => day.dietary_energy_kcal,
                Err(error) => {
                    warn!(date = %day_date, %error, "dietary sample fetch failed, leaving empty");
                    None
                }
            };
        }

        energy.fill_empty_values_with_averages();
        Ok(())
    }

    /// Batch-query the oracle once for the contiguous range covered by
    /// platform-sourced slots and write results back by offset.
    async fn fill_platform_dietary_range(&self, energy: &mut DietaryEnergy, start: NaiveDate) {
        let platform_offsets: Vec<usize> = energy
            .samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.sample_type == DietaryEnergySampleType::HealthPlatform)
            .map(|(offset, _)| offset)
            .collect();
        let (Some(&first), Some(&last)) = (platform_offsets.first(), platform_offsets.last())
        else {
            return;
        };

        let from = start + Duration::days(first as i64);
        let to = start + Duration::days(last as i64);
        let totals = match self.oracle.total_dietary_energy(from, to).await {
            Ok(totals) => totals.unwrap_or_default(),
            Err(error) => {
                warn!(%from, %to, %error, "dietary energy batch query failed, leaving empty");
                return;
            }
        };

        for offset in platform_offsets {
            let relative = (offset - first) as i64;
            energy.samples[offset].kcal = totals.get(&relative).copied();
        }
    }
}
