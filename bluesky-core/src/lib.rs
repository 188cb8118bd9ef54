//! Core library for the `bluesky` dashboard.
//!
//! This crate defines:
//! - The location registry and the static city table
//! - Abstraction over weather providers, with an Open-Meteo implementation
//! - The poll cycle and the blue sky rules
//! - The dashboard context and its background refresh loop
//! - Configuration handling
//!
//! It is used by `bluesky-cli`, but can also be driven by other front ends.

pub mod cities;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod poller;
pub mod provider;
pub mod registry;
pub mod rules;
pub mod scheduler;

pub use config::Config;
pub use dashboard::{Dashboard, PollSummary, RefreshOutcome};
pub use error::{FetchError, FetchFailure, LocationError, PollError};
pub use model::{
    Alert, ColorHint, CurrentConditions, DashboardView, IconCategory, Location, LocationId,
    LocationView, WeatherInfo, WeatherSnapshot,
};
pub use poller::{PollReport, poll_all};
pub use provider::{WeatherProvider, provider_from_config};
pub use registry::LocationRegistry;
pub use rules::{build_alerts, classify, is_blue_sky};
pub use scheduler::{RefreshLoop, spawn_refresh_loop};
