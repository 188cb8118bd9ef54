use crate::{
    Config,
    error::FetchError,
    model::{CurrentConditions, Location},
    provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod open_meteo;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch temperature, weather code and cloud cover at the location's coordinates.
    async fn current_conditions(&self, location: &Location)
    -> Result<CurrentConditions, FetchError>;
}

/// Construct the Open-Meteo provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    config.validate()?;
    let provider = OpenMeteoProvider::from_config(config)?;
    Ok(Arc::new(provider))
}
