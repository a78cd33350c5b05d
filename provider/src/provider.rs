//! Save and history-recalculation orchestration
//!
//! One logical save task exists per provider at a time: a new save cancels
//! and replaces the in-flight one. A save persists today's details, then
//! recomputes every day of history oldest to newest, then refetches today,
//! then resyncs with the health platform when a syncable attribute changed.
//! Cancellation is cooperative and already-persisted days are never rolled
//! back.

use chrono::{NaiveDate, Utc};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use biometrics_core::{HealthDetails, Height, LeanBodyMass, ReferenceValues, Weight};

use crate::cancel::CancellationToken;
use crate::config::ProviderConfig;
use crate::error::ProviderResult;
use crate::latest::LatestHealthDetails;
use crate::sampling::SampleFiller;
use crate::settings::Settings;
use crate::stores::{Day, DayStore, HealthOracle, PlanOracle, SettingsStore};

struct ProviderState {
    /// Today's details, as shown and edited
    current: HealthDetails,
    /// Snapshot of what was last persisted, for the no-op save guard
    last_saved: HealthDetails,
    /// The day currently displayed by the host, if any
    displayed: Option<Day>,
}

#[derive(Default)]
struct Tasks {
    save: Option<(CancellationToken, JoinHandle<()>)>,
    display: Option<JoinHandle<()>>,
}

/// Owns today's `HealthDetails` and sequences saves, recalculation and
/// resyncs. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct HealthProvider {
    store: Arc<dyn DayStore>,
    oracle: Arc<dyn HealthOracle>,
    settings_store: Arc<dyn SettingsStore>,
    plans: Arc<dyn PlanOracle>,
    config: ProviderConfig,
    state: Arc<tokio::sync::RwLock<ProviderState>>,
    tasks: Arc<Mutex<Tasks>>,
}

impl HealthProvider {
    /// Seed the provider with today's details from the backend
    pub async fn new(
        store: Arc<dyn DayStore>,
        oracle: Arc<dyn HealthOracle>,
        settings_store: Arc<dyn SettingsStore>,
        plans: Arc<dyn PlanOracle>,
        config: ProviderConfig,
    ) -> ProviderResult<Self> {
        let today = Utc::now().date_naive();
        let day = store.fetch_or_create_day(today).await?;
        let state = ProviderState {
            current: day.health_details.clone(),
            last_saved: day.health_details,
            displayed: None,
        };
        Ok(Self {
            store,
            oracle,
            settings_store,
            plans,
            config,
            state: Arc::new(tokio::sync::RwLock::new(state)),
            tasks: Arc::new(Mutex::new(Tasks::default())),
        })
    }

    /// Snapshot of today's details
    pub async fn current(&self) -> HealthDetails {
        self.state.read().await.current.clone()
    }

    /// The day fetched for display, once the debounce settled
    pub async fn displayed_day(&self) -> Option<Day> {
        self.state.read().await.displayed.clone()
    }

    /// Apply a user edit to today's details and recalculate derived fields
    pub async fn update_current<F>(&self, edit: F)
    where
        F: FnOnce(&mut HealthDetails),
    {
        let today = Utc::now().date_naive();
        let mut state = self.state.write().await;
        edit(&mut state.current);
        state.current.recalculate(&ReferenceValues::default(), today);
        state.current.touch();
    }

    /// Kick off a save. No-op when nothing changed and no resync is
    /// forced; otherwise the in-flight save (if any) is superseded.
    pub async fn save(&self, should_resync: bool) {
        {
            let state = self.state.read().await;
            if !should_resync && state.current.matches(&state.last_saved) {
                debug!("skipping save, details unchanged");
                return;
            }
        }

        let token = CancellationToken::new();
        let this = self.clone();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            match this.run_save(task_token, should_resync).await {
                Ok(()) => {}
                Err(err) if err.is_cancelled() => debug!("save superseded"),
                Err(err) => error!(%err, "save failed"),
            }
        });

        let mut tasks = self.tasks.lock().unwrap();
        if let Some((old_token, _)) = tasks.save.take() {
            old_token.cancel();
        }
        tasks.save = Some((token, handle));
    }

    /// Await the in-flight save, if any. Consumes the task record.
    pub async fn wait_for_save(&self) {
        let entry = self.tasks.lock().unwrap().save.take();
        if let Some((_, handle)) = entry {
            let _ = handle.await;
        }
    }

    /// Explicit event hook the host invokes when a platform import finishes
    pub async fn health_platform_import_completed(&self) {
        self.save(true).await;
    }

    /// Whether a weight edit on `date` would affect a weight-dependent
    /// plan. Never blocks recalculation.
    pub async fn is_weight_edit_plan_sensitive(&self, date: NaiveDate) -> bool {
        self.plans.is_plan_weight_dependent(date).await
    }

    /// Debounced displayed-date change: rapid scrubbing collapses into a
    /// single fetch once the picker settles.
    pub fn set_displayed_date(&self, date: NaiveDate) {
        let this = self.clone();
        let debounce = self.config.display_date_debounce();
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(old) = tasks.display.take() {
            old.abort();
        }
        tasks.display = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            match this.store.fetch_or_create_day(date).await {
                Ok(day) => this.state.write().await.displayed = Some(day),
                Err(err) => warn!(%date, %err, "displayed day fetch failed"),
            }
        }));
    }

    async fn run_save(
        &self,
        token: CancellationToken,
        should_resync: bool,
    ) -> ProviderResult<()> {
        let today = Utc::now().date_naive();

        // 1. Persist today's details
        let pre_save = self.state.read().await.current.clone();
        let mut day = self.store.fetch_or_create_day(today).await?;
        day.health_details = pre_save.clone();
        self.store.save_day(&day).await?;
        self.state.write().await.last_saved = pre_save.clone();
        token.check()?;

        // 2. Recompute the whole history
        let start = match self.store.days_start_date().await? {
            Some(start) => start,
            None => self.config.fallback_start_date.unwrap_or(today),
        };
        let settings = self.settings_store.settings();
        recalculate_all_days(
            &*self.store,
            &*self.oracle,
            settings,
            start,
            today,
            today,
            &token,
        )
        .await?;
        token.check()?;

        // 3. Refetch today: recalculation may have altered it indirectly
        let refreshed = self.store.fetch_or_create_day(today).await?.health_details;
        {
            let mut state = self.state.write().await;
            state.current = refreshed.clone();
            state.last_saved = refreshed.clone();
        }

        // 4. Resync when forced or a syncable attribute changed
        if should_resync || syncable_fields_differ(&pre_save, &refreshed) {
            token.check()?;
            if let Err(err) = self.oracle.resync().await {
                warn!(%err, "platform resync failed");
            }
            let refreshed = self.store.fetch_or_create_day(today).await?.health_details;
            let mut state = self.state.write().await;
            state.current = refreshed.clone();
            state.last_saved = refreshed;
        }
        Ok(())
    }
}

/// Recompute every day in `[from, to]` oldest to newest, persisting only
/// days whose content actually changed. Returns the number of days
/// persisted.
///
/// The fold over dates is sequential: each day may borrow the most recent
/// prior value of any attribute, accumulated only after the previous day
/// completed. Cancellation is checked at every day boundary.
pub async fn recalculate_all_days(
    store: &dyn DayStore,
    oracle: &dyn HealthOracle,
    settings: Settings,
    from: NaiveDate,
    to: NaiveDate,
    today: NaiveDate,
    token: &CancellationToken,
) -> ProviderResult<u32> {
    let days = store.fetch_all_days(from, to, true).await?;
    let filler = SampleFiller::new(oracle, store, settings);
    let mut latest = LatestHealthDetails::new();
    let mut persisted = 0;

    for (date, mut day) in days {
        token.check()?;

        let snapshot = day.health_details.clone();
        let reference = latest.reference_values();
        day.health_details.recalculate(&reference, today);

        if let Some(maintenance) = &mut day.health_details.maintenance {
            let interval = maintenance.adaptive.interval;
            filler
                .fill_weight_change(&mut maintenance.adaptive.weight_change, date, interval)
                .await;
            filler
                .fill_dietary_energy(&mut maintenance.adaptive.dietary_energy, date, interval)
                .await?;
            maintenance.adaptive.recalculate();
        }

        if !day.health_details.matches(&snapshot) {
            day.health_details.touch();
            store.save_day(&day).await?;
            persisted += 1;
            debug!(%date, "persisted recalculated day");
        }

        latest.update_from(&day.health_details);
    }
    Ok(persisted)
}

/// Whether any platform-syncable attribute differs between two snapshots
fn syncable_fields_differ(a: &HealthDetails, b: &HealthDetails) -> bool {
    fn platform_values(details: &HealthDetails) -> (Option<f64>, Option<f64>, Option<f64>) {
        let weight = match &details.weight {
            Some(Weight::HealthPlatform { kg, .. }) => *kg,
            _ => None,
        };
        let lean = match &details.lean_body_mass {
            Some(LeanBodyMass::HealthPlatform { kg }) => *kg,
            _ => None,
        };
        let height = match &details.height {
            Some(Height::HealthPlatform { cm }) => *cm,
            _ => None,
        };
        (weight, lean, height)
    }
    platform_values(a) != platform_values(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syncable_fields_differ() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut a = HealthDetails::new(date);
        let b = a.clone();
        assert!(!syncable_fields_differ(&a, &b));

        // User-entered weight is not syncable
        a.weight = Some(Weight::UserEntered { kg: 80.0 });
        assert!(!syncable_fields_differ(&a, &b));

        a.weight = Some(Weight::HealthPlatform { kg: Some(80.0), is_daily_average: false });
        assert!(syncable_fields_differ(&a, &b));
    }
}
