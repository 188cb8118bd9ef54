//! The coordinating context behind the interface: registry, snapshots, alerts and
//! the poll-cycle guard.
//!
//! Front ends hold it behind an `Arc` and call into it from any task. State lives
//! behind a synchronous lock that is never held across an `.await`; the poll cycle
//! itself is serialized by a separate async mutex so two polls never race.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::{MutexGuard, Notify, watch};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{LocationError, PollError},
    model::{Alert, DashboardView, Location, LocationId, LocationView, WeatherSnapshot},
    poller::{self, PollReport},
    provider::WeatherProvider,
    registry::LocationRegistry,
    rules,
};

/// Counts from a completed poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    pub fetched: usize,
    pub alerts: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed(PollSummary),
    /// Another poll was in flight; nothing was done.
    AlreadyRunning,
    Cancelled,
}

#[derive(Debug)]
struct DashboardState {
    registry: LocationRegistry,
    snapshots: HashMap<LocationId, WeatherSnapshot>,
    alerts: Vec<Alert>,
    last_polled_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct Dashboard {
    provider: Arc<dyn WeatherProvider>,
    state: Mutex<DashboardState>,
    poll_lock: tokio::sync::Mutex<()>,
    busy: AtomicBool,
    registry_changed: Notify,
    cycles: watch::Sender<u64>,
    cancel: CancellationToken,
}

impl Dashboard {
    pub fn new(provider: Arc<dyn WeatherProvider>, registry: LocationRegistry) -> Self {
        let (cycles, _) = watch::channel(0);
        Self {
            provider,
            state: Mutex::new(DashboardState {
                registry,
                snapshots: HashMap::new(),
                alerts: Vec::new(),
                last_polled_at: None,
            }),
            poll_lock: tokio::sync::Mutex::new(()),
            busy: AtomicBool::new(false),
            registry_changed: Notify::new(),
            cycles,
            cancel: CancellationToken::new(),
        }
    }

    /// Dashboard tracking London and Manchester.
    pub fn with_default_locations(provider: Arc<dyn WeatherProvider>) -> Self {
        Self::new(provider, LocationRegistry::with_defaults())
    }

    pub fn locations(&self) -> Vec<Location> {
        self.state.lock().registry.as_slice().to_vec()
    }

    pub fn snapshot(&self, id: LocationId) -> Option<WeatherSnapshot> {
        self.state.lock().snapshots.get(&id).copied()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.state.lock().alerts.clone()
    }

    pub fn last_polled_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().last_polled_at
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn view(&self) -> DashboardView {
        let state = self.state.lock();
        let locations = state
            .registry
            .as_slice()
            .iter()
            .map(|location| LocationView {
                location: location.clone(),
                snapshot: state.snapshots.get(&location.id).copied(),
            })
            .collect();

        DashboardView {
            locations,
            alerts: state.alerts.clone(),
            busy: self.is_busy(),
            last_polled_at: state.last_polled_at,
        }
    }

    /// Add a supported city. A refresh loop, if running, polls right after.
    pub fn add_location(&self, name: &str) -> Result<Location, LocationError> {
        let location = self.state.lock().registry.add(name)?.clone();
        tracing::info!(location = %location.name, id = %location.id, "tracking location");
        self.registry_changed.notify_one();
        Ok(location)
    }

    /// Stop tracking a location and drop its snapshot and alert. Returns whether it existed.
    pub fn remove_location(&self, id: LocationId) -> bool {
        let removed = {
            let mut state = self.state.lock();
            let removed = state.registry.remove(id);
            state.snapshots.remove(&id);
            state.alerts.retain(|alert| alert.location_id != id);
            removed
        };

        match removed {
            Some(location) => {
                tracing::info!(location = %location.name, %id, "stopped tracking location");
                self.registry_changed.notify_one();
                true
            }
            None => false,
        }
    }

    /// Run one poll cycle unless one is already in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        match self.poll_lock.try_lock() {
            Ok(guard) => self.poll_cycle(guard).await,
            Err(_) => {
                tracing::debug!("refresh skipped, a poll is already in flight");
                RefreshOutcome::AlreadyRunning
            }
        }
    }

    /// Wait for any in-flight poll to finish, then run a fresh one.
    pub async fn refresh_when_idle(&self) -> RefreshOutcome {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => RefreshOutcome::Cancelled,
            guard = self.poll_lock.lock() => self.poll_cycle(guard).await,
        }
    }

    /// Receiver of the number of completed poll cycles.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.cycles.subscribe()
    }

    /// Resolves after the next `add_location`/`remove_location` that changed the registry.
    pub async fn registry_changed(&self) {
        self.registry_changed.notified().await;
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Abort in-flight requests and refuse further polls.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!("dashboard shutting down");
        }
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    async fn poll_cycle(&self, _guard: MutexGuard<'_, ()>) -> RefreshOutcome {
        if self.cancel.is_cancelled() {
            return RefreshOutcome::Cancelled;
        }

        let _busy = BusyFlag::raise(&self.busy);
        let locations = self.locations();
        tracing::debug!(locations = locations.len(), "poll cycle started");

        match poller::poll_all(Arc::clone(&self.provider), &locations, &self.cancel).await {
            Ok(report) => {
                let summary = self.apply(report);
                tracing::info!(
                    fetched = summary.fetched,
                    alerts = summary.alerts,
                    failed = summary.failed,
                    "poll cycle completed"
                );
                self.cycles.send_modify(|count| *count += 1);
                RefreshOutcome::Completed(summary)
            }
            Err(PollError::Cancelled) => RefreshOutcome::Cancelled,
        }
    }

    /// Replace snapshots and alerts wholesale. Locations removed while the poll was in
    /// flight are filtered out so no stale entry survives.
    fn apply(&self, report: PollReport) -> PollSummary {
        let mut state = self.state.lock();
        let PollReport {
            mut snapshots,
            failures,
            ..
        } = report;

        snapshots.retain(|id, _| state.registry.contains(*id));
        let alerts = rules::build_alerts(state.registry.as_slice(), &snapshots);

        let summary = PollSummary {
            fetched: snapshots.len(),
            alerts: alerts.len(),
            failed: failures.len(),
        };

        state.snapshots = snapshots;
        state.alerts = alerts;
        state.last_polled_at = Some(Utc::now());
        summary
    }
}

/// Keeps the busy flag raised for the lifetime of a poll, including when the poll
/// future is dropped mid-flight.
struct BusyFlag<'a>(&'a AtomicBool);

impl<'a> BusyFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
