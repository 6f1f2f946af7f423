mod common;

use common::{CountingRng, TableBackend};
use pulsemap::{estimate, prelude::*};
use std::sync::Arc;

fn when() -> EstimateWhen {
    EstimateWhen::parse("2025-09-20", "08:30").unwrap()
}

fn id(value: &str) -> Arc<str> {
    value.into()
}

#[test]
fn request_payload_test() {
    let store = common::store();
    let station = store.station_by_id("Downtown Crossing_Red").unwrap();
    let request = EstimateRequest::new(station, &when());
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["nodeId"], "Downtown Crossing_Red");
    assert_eq!(json["date"], "2025-09-20");
    assert_eq!(json["time"], "08:30");
    assert_eq!(json["station"], "Downtown Crossing");
    assert_eq!(json["line"], "Red");
    assert_eq!(json["lat"], 42.3555);
    assert_eq!(json["lon"], -71.0604);
}

#[test]
fn when_parse_test() {
    assert!(EstimateWhen::parse("2025-02-30", "08:30").is_err());
    assert!(matches!(
        EstimateWhen::parse("2025-09-20", "8h"),
        Err(estimate::Error::InvalidTime(_))
    ));
}

#[test]
fn response_load_test() {
    assert_eq!(EstimateResponse { value: 21.6 }.load(), Ok(22));
    assert!(EstimateResponse { value: f64::NAN }.load().is_err());
}

#[test]
fn begin_skips_unknown_station_test() {
    let store = common::store();
    let mut estimates = Estimates::default();
    let pending = estimates.begin(
        vec![id("Park St_Red"), id("Nowhere_Red")],
        &store,
        &when(),
    );
    assert_eq!(pending.requests.len(), 1);
    assert_eq!(pending.requests[0].0.as_ref(), "Park St_Red");
}

#[tokio::test]
async fn partial_failure_test() {
    let store = common::store();
    let backend = TableBackend::new(&[("Park St_Red", 15), ("South Station_RED", 27)]);
    let mut estimates = Estimates::default();
    let pending = estimates.begin(
        vec![
            id("Park St_Red"),
            id("Downtown Crossing_Red"),
            id("South Station_RED"),
        ],
        &store,
        &when(),
    );
    let mut rng = CountingRng::new(3);
    let batch = estimate::run_batch(&backend, pending, &mut rng).await;
    assert_eq!(batch.fallback_count(), 1);
    assert!(rng.draws > 0);
    assert!(estimates.publish(batch));

    let cache = estimates.cache();
    assert_eq!(cache.len(), 3);
    for (_, estimate) in cache.iter() {
        assert!((14..=28).contains(&estimate.value));
    }
    assert_eq!(
        cache.get("Park St_Red"),
        Some(&Estimate {
            value: 15,
            source: EstimateSource::Backend
        })
    );
    assert_eq!(
        cache.get("South Station_RED"),
        Some(&Estimate {
            value: 27,
            source: EstimateSource::Backend
        })
    );
    assert_eq!(
        cache.get("Downtown Crossing_Red").unwrap().source,
        EstimateSource::Fallback
    );
    assert!(estimates.degraded());
    assert!(estimates.grown().is_none());
}

#[tokio::test]
async fn all_success_draws_no_randomness_test() {
    let store = common::store();
    let backend = TableBackend::new(&[("Park St_Green", 19), ("Government Center_Green", 22)]);
    let mut estimates = Estimates::default();
    let pending = estimates.begin(
        vec![id("Park St_Green"), id("Government Center_Green")],
        &store,
        &when(),
    );
    let mut rng = CountingRng::new(3);
    let batch = estimate::run_batch(&backend, pending, &mut rng).await;
    assert_eq!(rng.draws, 0);
    assert!(estimates.publish(batch));
    assert!(!estimates.degraded());
}

#[tokio::test]
async fn fallback_always_in_range_test() {
    let store = common::store();
    let backend = TableBackend::default();
    let ids: Vec<Arc<str>> = store.stations.iter().map(|station| station.id.clone()).collect();
    for seed in 0..50 {
        let mut estimates = Estimates::default();
        let pending = estimates.begin(ids.clone(), &store, &when());
        let mut rng = CountingRng::new(seed);
        let batch = estimate::run_batch(&backend, pending, &mut rng).await;
        assert_eq!(batch.results.len(), ids.len());
        for (_, estimate) in batch.results.iter() {
            assert_eq!(estimate.source, EstimateSource::Fallback);
            assert!((14..=28).contains(&estimate.value));
        }
    }
}

#[tokio::test]
async fn single_station_grows_test() {
    let store = common::store();
    let backend = TableBackend::new(&[("Haymarket_Orange/Green", 24)]);
    let mut estimates = Estimates::default();
    let pending = estimates.begin(vec![id("Haymarket_Orange/Green")], &store, &when());
    let batch = estimate::run_batch(&backend, pending, &mut CountingRng::new(1)).await;
    estimates.publish(batch);
    let grown = estimates.grown().unwrap();
    assert_eq!(grown.id.as_ref(), "Haymarket_Orange/Green");
    assert_eq!(grown.value, 24);
    assert_eq!(estimates.value_for("Haymarket_Orange/Green"), Some(24));
}

#[tokio::test]
async fn batch_replaces_not_merges_test() {
    let store = common::store();
    let backend = TableBackend::new(&[("Park St_Red", 15), ("Park St_Green", 18)]);
    let mut estimates = Estimates::default();

    let pending = estimates.begin(vec![id("Park St_Red")], &store, &when());
    let batch = estimate::run_batch(&backend, pending, &mut CountingRng::new(1)).await;
    estimates.publish(batch);

    let pending = estimates.begin(vec![id("Park St_Green")], &store, &when());
    let batch = estimate::run_batch(&backend, pending, &mut CountingRng::new(1)).await;
    estimates.publish(batch);

    assert_eq!(estimates.cache().len(), 1);
    assert!(estimates.cache().get("Park St_Red").is_none());
    assert_eq!(estimates.value_for("Park St_Green"), Some(18));
}

#[tokio::test]
async fn stale_batch_dropped_test() {
    let store = common::store();
    let backend = TableBackend::new(&[("Park St_Red", 15), ("Park St_Green", 18)]);
    let mut estimates = Estimates::default();

    let first = estimates.begin(vec![id("Park St_Red")], &store, &when());
    let second = estimates.begin(vec![id("Park St_Green")], &store, &when());

    let second = estimate::run_batch(&backend, second, &mut CountingRng::new(1)).await;
    assert!(estimates.publish(second));
    let first = estimate::run_batch(&backend, first, &mut CountingRng::new(1)).await;
    assert!(!estimates.publish(first));

    assert_eq!(estimates.value_for("Park St_Green"), Some(18));
    assert_eq!(estimates.value_for("Park St_Red"), None);
}

#[tokio::test]
async fn reset_drops_in_flight_batch_test() {
    let store = common::store();
    let backend = TableBackend::new(&[("Park St_Red", 15)]);
    let mut estimates = Estimates::default();
    let pending = estimates.begin(vec![id("Park St_Red")], &store, &when());
    estimates.reset();
    let batch = estimate::run_batch(&backend, pending, &mut CountingRng::new(1)).await;
    assert!(!estimates.publish(batch));
    assert!(estimates.cache().is_empty());
}
