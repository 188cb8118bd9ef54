use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::dashboard::{Dashboard, RefreshOutcome};

/// Handle to the background task that keeps a dashboard fresh.
#[derive(Debug)]
pub struct RefreshLoop {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Poll immediately, then every `period` and after every registry change.
///
/// The loop shares the dashboard's cancellation token, so stopping it also aborts any
/// in-flight requests.
pub fn spawn_refresh_loop(dashboard: Arc<Dashboard>, period: Duration) -> RefreshLoop {
    let cancel = dashboard.cancellation_token();
    let handle = tokio::spawn(run(dashboard, period, cancel.clone()));
    RefreshLoop { cancel, handle }
}

impl RefreshLoop {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the loop and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.handle.await {
            tracing::error!(error = %err, "refresh loop task failed");
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Timer,
    LocationsChanged,
}

impl Trigger {
    fn as_str(&self) -> &'static str {
        match self {
            Trigger::Timer => "timer",
            Trigger::LocationsChanged => "locations changed",
        }
    }
}

async fn run(dashboard: Arc<Dashboard>, period: Duration, cancel: CancellationToken) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(period_secs = period.as_secs(), "refresh loop started");

    loop {
        let trigger = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = dashboard.registry_changed() => Trigger::LocationsChanged,
            _ = ticker.tick() => Trigger::Timer,
        };

        tracing::debug!(trigger = trigger.as_str(), "refreshing");
        let outcome = match trigger {
            Trigger::LocationsChanged => {
                ticker.reset();
                dashboard.refresh_when_idle().await
            }
            Trigger::Timer => dashboard.refresh().await,
        };

        match outcome {
            RefreshOutcome::Completed(_) => {}
            RefreshOutcome::AlreadyRunning => {
                tracing::debug!("timer tick skipped, a poll is already in flight");
            }
            RefreshOutcome::Cancelled => break,
        }
    }

    tracing::info!("refresh loop stopped");
}
