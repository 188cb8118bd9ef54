//! Scripted weather provider shared by the integration tests.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use bluesky_core::{CurrentConditions, Dashboard, FetchError, Location, WeatherProvider};
use tokio::sync::Semaphore;

#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    Conditions(CurrentConditions),
    Fail(u16),
}

/// Answers by location name. Unscripted names fail with a 404.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<HashMap<String, Scripted>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests block until permits are added to the returned semaphore.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let provider = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (provider, gate)
    }

    pub fn set(&self, name: &str, scripted: Scripted) {
        self.script
            .lock()
            .unwrap()
            .insert(name.to_string(), scripted);
    }

    pub fn clear_sky(&self, name: &str) {
        self.set(
            name,
            Scripted::Conditions(CurrentConditions {
                temperature_c: 20.4,
                weather_code: 0,
                cloud_cover_pct: 5.0,
            }),
        );
    }

    pub fn overcast(&self, name: &str) {
        self.set(
            name,
            Scripted::Conditions(CurrentConditions {
                temperature_c: 11.5,
                weather_code: 3,
                cloud_cover_pct: 95.0,
            }),
        );
    }

    pub fn fail(&self, name: &str, status: u16) {
        self.set(name, Scripted::Fail(status));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for ScriptedProvider {
    async fn current_conditions(
        &self,
        location: &Location,
    ) -> Result<CurrentConditions, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.map_err(|_| FetchError::Aborted)?;
        }

        let scripted = self.script.lock().unwrap().get(&location.name).copied();
        match scripted {
            Some(Scripted::Conditions(conditions)) => Ok(conditions),
            Some(Scripted::Fail(status)) => Err(FetchError::Status {
                status,
                body: "scripted failure".into(),
            }),
            None => Err(FetchError::Status {
                status: 404,
                body: format!("no script for {}", location.name),
            }),
        }
    }
}

pub async fn wait_until_busy(dashboard: &Dashboard) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !dashboard.is_busy() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("poll never started");
}
