mod support;

use std::sync::Arc;

use bluesky_core::{
    FetchError, Location, LocationId, LocationRegistry, PollError, WeatherProvider, poll_all,
};
use support::ScriptedProvider;
use tokio_util::sync::CancellationToken;

fn three_locations() -> Vec<Location> {
    let mut registry = LocationRegistry::with_defaults();
    registry.add("Oxford").unwrap();
    registry.as_slice().to_vec()
}

#[tokio::test]
async fn one_failure_does_not_abort_the_batch() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.clear_sky("London");
    provider.fail("Manchester", 500);
    provider.overcast("Oxford");

    let locations = three_locations();
    let report = poll_all(provider.clone(), &locations, &CancellationToken::new())
        .await
        .expect("poll should complete");

    assert_eq!(provider.calls(), 3);
    assert_eq!(report.snapshots.len(), 2);
    assert!(report.snapshots.contains_key(&locations[0].id));
    assert!(!report.snapshots.contains_key(&locations[1].id));
    assert!(report.snapshots.contains_key(&locations[2].id));

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.location_id, locations[1].id);
    assert_eq!(failure.location_name, "Manchester");
    assert!(matches!(failure.error, FetchError::Status { status: 500, .. }));

    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].location_name, "London");
}

#[tokio::test]
async fn alerts_match_blue_sky_snapshots_in_registry_order() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.clear_sky("London");
    provider.overcast("Manchester");
    provider.clear_sky("Oxford");

    let locations = three_locations();
    let report = poll_all(provider, &locations, &CancellationToken::new())
        .await
        .unwrap();

    let expected: Vec<LocationId> = locations
        .iter()
        .filter(|loc| report.snapshots[&loc.id].is_blue_sky)
        .map(|loc| loc.id)
        .collect();
    let actual: Vec<LocationId> = report.alerts.iter().map(|a| a.location_id).collect();

    assert_eq!(actual, expected);
    assert_eq!(actual, vec![locations[0].id, locations[2].id]);

    let london = report.snapshots[&locations[0].id];
    assert_eq!(london.temperature_c, 20);
    assert_eq!(london.cloud_cover_pct, 5);
}

#[tokio::test]
async fn no_locations_yields_empty_report() {
    let provider: Arc<dyn WeatherProvider> = Arc::new(ScriptedProvider::new());
    let report = poll_all(provider, &[], &CancellationToken::new())
        .await
        .unwrap();

    assert!(report.snapshots.is_empty());
    assert!(report.alerts.is_empty());
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn cancellation_aborts_in_flight_requests() {
    let (provider, _gate) = ScriptedProvider::gated();
    let provider = Arc::new(provider);
    provider.clear_sky("London");

    let token = CancellationToken::new();
    let locations = three_locations();

    let task = tokio::spawn({
        let provider = provider.clone();
        let token = token.clone();
        async move { poll_all(provider, &locations, &token).await.map(|_| ()) }
    });

    tokio::task::yield_now().await;
    token.cancel();

    assert_eq!(task.await.unwrap(), Err(PollError::Cancelled));
}
