//! Integration tests for full-history recalculation

mod common;

use common::{date, init_tracing, MockDayStore, MockOracle};

use biometrics_core::{
    DietaryEnergy, DietaryEnergySample, DietaryEnergySampleType, HealthInterval, Height,
    IntervalPeriod, LeanBodyMass, LeanBodyMassEquation, Maintenance, Sex, SexRecord, Weight,
};
use biometrics_provider::{recalculate_all_days, CancellationToken, Day, Settings};

fn day_with_basics(d: chrono::NaiveDate) -> Day {
    let mut day = Day::new(d);
    day.health_details.weight = Some(Weight::UserEntered { kg: 80.0 });
    day.health_details.height = Some(Height::UserEntered { cm: 180.0 });
    day.health_details.sex = Some(SexRecord::UserEntered { sex: Sex::Male });
    day
}

fn day_with_equation_lbm(d: chrono::NaiveDate) -> Day {
    let mut day = Day::new(d);
    day.health_details.lean_body_mass = Some(LeanBodyMass::Equation {
        equation: LeanBodyMassEquation::Boer,
        kg: None,
    });
    day
}

// Ascending order matters here: a later day's equation depends on
// the most recent prior day's raw attributes
#[tokio::test]
async fn test_history_scan_borrows_prior_values_in_ascending_order() {
    init_tracing();
    let store = MockDayStore::with_days(vec![
        day_with_basics(date(2024, 1, 1)),
        day_with_equation_lbm(date(2024, 1, 2)),
        day_with_equation_lbm(date(2024, 1, 3)),
    ]);
    let oracle = MockOracle::default();
    let token = CancellationToken::new();

    let persisted = recalculate_all_days(
        &store,
        &oracle,
        Settings::default(),
        date(2024, 1, 1),
        date(2024, 1, 3),
        date(2024, 1, 3),
        &token,
    )
    .await
    .unwrap();

    // Days 2 and 3 had no weight/height/sex of their own; their lean body
    // mass can only come from day 1's values carried forward. Processing
    // in any other order would leave them None.
    let days = store.days.lock().unwrap();
    for d in [date(2024, 1, 2), date(2024, 1, 3)] {
        let kg = days[&d].health_details.lean_body_mass.unwrap().kg().unwrap();
        assert!((kg - 61.42).abs() < 0.01, "day {d}: {kg}");
    }

    assert_eq!(persisted, 2);
    let saved = store.saved_dates();
    assert_eq!(saved, vec![date(2024, 1, 2), date(2024, 1, 3)]);
    let mut sorted = saved.clone();
    sorted.sort();
    assert_eq!(saved, sorted);
}

// A day whose recalculated output matches its stored state is never
// written back
#[tokio::test]
async fn test_unchanged_day_is_not_persisted() {
    init_tracing();
    let store = MockDayStore::with_days(vec![day_with_basics(date(2024, 1, 1))]);
    let oracle = MockOracle::default();
    let token = CancellationToken::new();

    let persisted = recalculate_all_days(
        &store,
        &oracle,
        Settings::default(),
        date(2024, 1, 1),
        date(2024, 1, 1),
        date(2024, 1, 1),
        &token,
    )
    .await
    .unwrap();

    assert_eq!(persisted, 0);
    assert!(store.saved_dates().is_empty());
}

// Cancelling mid-scan leaves already-persisted days valid and never
// half-writes the day being processed
#[tokio::test]
async fn test_cancellation_preserves_committed_days() {
    init_tracing();
    let mut days = vec![day_with_basics(date(2024, 1, 1))];
    for d in 2..=5 {
        days.push(day_with_equation_lbm(date(2024, 1, d)));
    }
    let store = MockDayStore::with_days(days);
    let oracle = MockOracle::default();
    let token = CancellationToken::new();

    // Day 1 is already consistent; days 2..5 each change when processed.
    // Cancel once two days have been written.
    *store.cancel_after_saves.lock().unwrap() = Some((2, token.clone()));

    let result = recalculate_all_days(
        &store,
        &oracle,
        Settings::default(),
        date(2024, 1, 1),
        date(2024, 1, 5),
        date(2024, 1, 5),
        &token,
    )
    .await;

    assert!(result.as_ref().is_err_and(|e| e.is_cancelled()));
    assert_eq!(store.saved_dates(), vec![date(2024, 1, 2), date(2024, 1, 3)]);

    let days = store.days.lock().unwrap();
    // Committed days hold their recalculated values
    for d in [date(2024, 1, 2), date(2024, 1, 3)] {
        assert!(days[&d].health_details.lean_body_mass.unwrap().kg().is_some());
    }
    // Days past the cancellation point were never touched
    for d in [date(2024, 1, 4), date(2024, 1, 5)] {
        assert_eq!(days[&d].health_details.lean_body_mass.unwrap().kg(), None);
    }
}

// End to end: adaptive maintenance computed from oracle-backed samples
#[tokio::test]
async fn test_adaptive_maintenance_computed_during_scan() {
    init_tracing();
    let interval = HealthInterval::new(1, IntervalPeriod::Week);

    let mut today = Day::new(date(2024, 1, 8));
    let mut maintenance = Maintenance { prefers_adaptive: true, ..Default::default() };
    maintenance.adaptive.interval = interval;
    maintenance.adaptive.dietary_energy = DietaryEnergy {
        samples: vec![
            DietaryEnergySample {
                sample_type: DietaryEnergySampleType::HealthPlatform,
                kcal: None,
            };
            7
        ],
    };
    today.health_details.maintenance = Some(maintenance);

    let store = MockDayStore::with_days(vec![day_with_basics(date(2024, 1, 1)), today]);
    let oracle = MockOracle::default();
    oracle.set_weight(date(2024, 1, 1), 80.0);
    oracle.set_weight(date(2024, 1, 8), 79.0);
    for d in 1..=7 {
        oracle.set_dietary(date(2024, 1, d), 2000.0);
    }

    let token = CancellationToken::new();
    recalculate_all_days(
        &store,
        &oracle,
        Settings::default(),
        date(2024, 1, 1),
        date(2024, 1, 8),
        date(2024, 1, 8),
        &token,
    )
    .await
    .unwrap();

    let days = store.days.lock().unwrap();
    let adaptive = &days[&date(2024, 1, 8)]
        .health_details
        .maintenance
        .as_ref()
        .unwrap()
        .adaptive;

    // Lost 1 kg over a week eating 14000 kcal: (14000 + 7716.2) / 7
    let value = adaptive.kcal_per_day.unwrap();
    assert!((value - 3102.3).abs() < 0.1, "value = {value}");
    assert_eq!(adaptive.error, None);
    assert_eq!(adaptive.weight_change.current.kg, Some(79.0));
    assert_eq!(adaptive.weight_change.previous.kg, Some(80.0));
}

// Oracle failure degrades samples instead of aborting the scan
#[tokio::test]
async fn test_oracle_failure_degrades_to_error_not_abort() {
    init_tracing();
    let interval = HealthInterval::new(1, IntervalPeriod::Week);

    let mut today = Day::new(date(2024, 1, 8));
    let mut maintenance = Maintenance::default();
    maintenance.adaptive.interval = interval;
    maintenance.adaptive.dietary_energy = DietaryEnergy::empty(interval);
    today.health_details.maintenance = Some(maintenance);

    let store = MockDayStore::with_days(vec![today]);
    let oracle = MockOracle::default();
    oracle.fail_all();

    let token = CancellationToken::new();
    let result = recalculate_all_days(
        &store,
        &oracle,
        Settings::default(),
        date(2024, 1, 8),
        date(2024, 1, 8),
        date(2024, 1, 8),
        &token,
    )
    .await;

    // The scan completes; the day's adaptive result is a typed error
    assert!(result.is_ok());
    let days = store.days.lock().unwrap();
    let adaptive = &days[&date(2024, 1, 8)]
        .health_details
        .maintenance
        .as_ref()
        .unwrap()
        .adaptive;
    assert_eq!(adaptive.kcal_per_day, None);
    assert!(adaptive.error.is_some());
}
