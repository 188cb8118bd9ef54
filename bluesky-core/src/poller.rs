//! One poll cycle: fetch every location concurrently, evaluate, derive alerts.

use std::{collections::HashMap, sync::Arc};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{FetchError, FetchFailure, PollError},
    model::{Alert, CurrentConditions, Location, LocationId, WeatherSnapshot},
    provider::WeatherProvider,
    rules,
};

/// Result of a completed poll cycle.
#[derive(Debug, Default)]
pub struct PollReport {
    pub snapshots: HashMap<LocationId, WeatherSnapshot>,
    pub alerts: Vec<Alert>,
    pub failures: Vec<FetchFailure>,
}

/// Fetch current conditions for every location.
///
/// A failed fetch is logged and recorded in `failures`; it never aborts the batch.
/// Cancelling `cancel` aborts the outstanding requests.
pub async fn poll_all(
    provider: Arc<dyn WeatherProvider>,
    locations: &[Location],
    cancel: &CancellationToken,
) -> Result<PollReport, PollError> {
    let mut tasks = JoinSet::new();
    for (index, location) in locations.iter().cloned().enumerate() {
        let provider = Arc::clone(&provider);
        tasks.spawn(async move { (index, provider.current_conditions(&location).await) });
    }

    let mut results: Vec<Option<Result<CurrentConditions, FetchError>>> =
        locations.iter().map(|_| None).collect();

    loop {
        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                // Dropping the JoinSet aborts the outstanding fetches.
                tracing::info!("poll cycle cancelled");
                return Err(PollError::Cancelled);
            }
            joined = tasks.join_next() => joined,
        };

        match joined {
            Some(Ok((index, result))) => results[index] = Some(result),
            Some(Err(err)) => tracing::error!(error = %err, "weather fetch task failed"),
            None => break,
        }
    }

    let mut report = PollReport::default();
    for (location, result) in locations.iter().zip(results) {
        match result.unwrap_or(Err(FetchError::Aborted)) {
            Ok(conditions) => {
                let snapshot = WeatherSnapshot::from_conditions(&conditions);
                tracing::debug!(
                    location = %location.name,
                    temperature_c = snapshot.temperature_c,
                    weather_code = snapshot.weather_code,
                    cloud_cover_pct = snapshot.cloud_cover_pct,
                    blue_sky = snapshot.is_blue_sky,
                    "weather fetched"
                );
                report.snapshots.insert(location.id, snapshot);
            }
            Err(error) => {
                tracing::warn!(location = %location.name, %error, "failed to fetch weather");
                report.failures.push(FetchFailure {
                    location_id: location.id,
                    location_name: location.name.clone(),
                    error,
                });
            }
        }
    }
    report.alerts = rules::build_alerts(locations, &report.snapshots);

    Ok(report)
}
