//! Integration tests for save orchestration and display debouncing

mod common;

use common::{date, init_tracing, MockDayStore, MockOracle, MockPlans, MockSettings};

use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use biometrics_core::Weight;
use biometrics_provider::{HealthProvider, ProviderConfig};

async fn provider_with(
    store: Arc<MockDayStore>,
    oracle: Arc<MockOracle>,
    config: ProviderConfig,
) -> HealthProvider {
    HealthProvider::new(
        store,
        oracle,
        Arc::new(MockSettings::default()),
        Arc::new(MockPlans { weight_dependent: false }),
        config,
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_save_is_noop_when_nothing_changed() {
    init_tracing();
    let store = Arc::new(MockDayStore::default());
    let oracle = Arc::new(MockOracle::default());
    let provider = provider_with(store.clone(), oracle.clone(), ProviderConfig::default()).await;

    provider.save(false).await;
    provider.wait_for_save().await;

    assert!(store.saved_dates().is_empty());
    assert_eq!(oracle.resync_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_edit_is_persisted_by_save() {
    init_tracing();
    let store = Arc::new(MockDayStore::default());
    let oracle = Arc::new(MockOracle::default());
    let provider = provider_with(store.clone(), oracle.clone(), ProviderConfig::default()).await;
    let today = Utc::now().date_naive();

    provider
        .update_current(|details| {
            details.weight = Some(Weight::UserEntered { kg: 80.0 });
        })
        .await;
    provider.save(false).await;
    provider.wait_for_save().await;

    assert!(store.saved_dates().contains(&today));
    let days = store.days.lock().unwrap();
    assert_eq!(
        days[&today].health_details.weight,
        Some(Weight::UserEntered { kg: 80.0 })
    );
    drop(days);
    assert_eq!(
        provider.current().await.weight,
        Some(Weight::UserEntered { kg: 80.0 })
    );
}

#[tokio::test]
async fn test_repeat_save_without_new_edit_is_noop() {
    init_tracing();
    let store = Arc::new(MockDayStore::default());
    let oracle = Arc::new(MockOracle::default());
    let provider = provider_with(store.clone(), oracle.clone(), ProviderConfig::default()).await;

    provider
        .update_current(|details| {
            details.weight = Some(Weight::UserEntered { kg: 80.0 });
        })
        .await;
    provider.save(false).await;
    provider.wait_for_save().await;
    let saves_after_first = store.saved_dates().len();

    provider.save(false).await;
    provider.wait_for_save().await;
    assert_eq!(store.saved_dates().len(), saves_after_first);
}

#[tokio::test]
async fn test_platform_import_triggers_resync() {
    init_tracing();
    let store = Arc::new(MockDayStore::default());
    let oracle = Arc::new(MockOracle::default());
    let provider = provider_with(store.clone(), oracle.clone(), ProviderConfig::default()).await;

    provider.health_platform_import_completed().await;
    provider.wait_for_save().await;

    assert_eq!(oracle.resync_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_new_save_supersedes_in_flight_save() {
    init_tracing();
    let store = Arc::new(MockDayStore::default());
    let oracle = Arc::new(MockOracle::default());
    *store.save_delay_ms.lock().unwrap() = Some(100);
    let provider = provider_with(store.clone(), oracle.clone(), ProviderConfig::default()).await;

    // Both saves force a resync; the first is cancelled while still inside
    // its initial (slowed) persist, so only the second one resyncs.
    provider.save(true).await;
    provider.save(true).await;
    provider.wait_for_save().await;
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(oracle.resync_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_displayed_date_is_debounced() {
    init_tracing();
    let store = Arc::new(MockDayStore::default());
    let oracle = Arc::new(MockOracle::default());
    let config = ProviderConfig { display_date_debounce_ms: 50, ..Default::default() };
    let provider = provider_with(store.clone(), oracle.clone(), config).await;

    // Scrubbing: only the date the picker settles on is fetched
    provider.set_displayed_date(date(2024, 3, 10));
    provider.set_displayed_date(date(2024, 3, 11));
    tokio::time::sleep(Duration::from_millis(150)).await;

    let displayed = provider.displayed_day().await.unwrap();
    assert_eq!(displayed.date, date(2024, 3, 11));
    let days = store.days.lock().unwrap();
    assert!(days.contains_key(&date(2024, 3, 11)));
    assert!(!days.contains_key(&date(2024, 3, 10)));
}

#[tokio::test]
async fn test_weight_edit_plan_sensitivity_reflects_plan_oracle() {
    init_tracing();
    let store = Arc::new(MockDayStore::default());
    let oracle = Arc::new(MockOracle::default());
    let provider = HealthProvider::new(
        store,
        oracle,
        Arc::new(MockSettings::default()),
        Arc::new(MockPlans { weight_dependent: true }),
        ProviderConfig::default(),
    )
    .await
    .unwrap();

    assert!(provider.is_weight_edit_plan_sensitive(date(2024, 3, 10)).await);
}
