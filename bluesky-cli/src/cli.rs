use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use bluesky_core::{
    Config, Dashboard, LocationRegistry, RefreshOutcome, cities,
    config::{MAX_REFRESH_INTERVAL_MINS, MAX_REQUEST_TIMEOUT_SECS},
    provider_from_config, spawn_refresh_loop,
};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "bluesky", version, about = "Blue sky alerts for UK cities")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the cities that can be added by name.
    Cities,

    /// Poll once and print the dashboard.
    Check {
        /// Extra city to track on top of London and Manchester. Repeatable.
        #[arg(long = "city")]
        cities: Vec<String>,
    },

    /// Keep polling and print the dashboard after every refresh, until Ctrl-C.
    Watch {
        /// Extra city to track on top of London and Manchester. Repeatable.
        #[arg(long = "city")]
        cities: Vec<String>,
    },

    /// Interactive dashboard: refresh, add and remove locations.
    Dashboard,

    /// Edit and save the configuration.
    Configure,
}

impl Cli {
    /// Interactive commands keep stderr quiet so log lines don't break the prompts.
    pub fn default_log_filter(&self) -> &'static str {
        match self.command {
            Command::Dashboard | Command::Configure => "warn",
            _ => "bluesky=info,bluesky_core=info",
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { config, command } = self;

        match command {
            Command::Cities => {
                println!("Supported cities:");
                for city in &cities::SUPPORTED_CITIES {
                    println!("  {:<12} {:>8.4}, {:>8.4}", city.name, city.lat, city.lon);
                }
            }
            Command::Check { cities } => {
                let config = load_config(config.as_deref())?;
                let dashboard = build_dashboard(&config, &cities)?;

                if let RefreshOutcome::Completed(summary) = dashboard.refresh().await {
                    tracing::info!(failed = summary.failed, "check finished");
                }
                println!("{}", render::dashboard(&dashboard.view()));
            }
            Command::Watch { cities } => {
                let config = load_config(config.as_deref())?;
                let dashboard = Arc::new(build_dashboard(&config, &cities)?);
                watch(dashboard, &config).await;
            }
            Command::Dashboard => {
                let config = load_config(config.as_deref())?;
                let dashboard = Arc::new(build_dashboard(&config, &[])?);
                interactive::run(dashboard, config.refresh_interval()).await?;
            }
            Command::Configure => configure(config.as_deref())?,
        }

        Ok(())
    }
}

fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::config_file_path(),
    }
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    Config::load_from(&config_path(explicit)?)
}

/// Defaults plus any extra cities. Unknown names are reported and skipped.
fn build_dashboard(config: &Config, extra_cities: &[String]) -> anyhow::Result<Dashboard> {
    let mut registry = LocationRegistry::with_defaults();
    for name in extra_cities {
        if let Err(err) = registry.add(name) {
            eprintln!("Skipping '{name}': {err}");
        }
    }

    let provider = provider_from_config(config)?;
    Ok(Dashboard::new(provider, registry))
}

async fn watch(dashboard: Arc<Dashboard>, config: &Config) {
    let mut cycles = dashboard.subscribe();
    let refresh_loop = spawn_refresh_loop(Arc::clone(&dashboard), config.refresh_interval());

    println!(
        "Watching {} locations, refreshing every {} minutes. Press Ctrl-C to stop.",
        dashboard.locations().len(),
        config.refresh_interval_mins
    );

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    tracing::error!(error = %err, "failed to listen for Ctrl-C");
                }
                break;
            }
            changed = cycles.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", render::dashboard(&dashboard.view()));
            }
        }
    }

    refresh_loop.shutdown().await;
}

fn configure(explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = config_path(explicit)?;
    let mut config = Config::load_from(&path)?;

    let timezone = Text::new("Timezone:")
        .with_default(&config.timezone)
        .prompt()
        .context("Failed to read timezone")?;

    let refresh_interval_mins = CustomType::<u64>::new("Refresh interval (minutes):")
        .with_default(config.refresh_interval_mins)
        .with_help_message(&format!("1 to {MAX_REFRESH_INTERVAL_MINS}"))
        .with_error_message("Please type a whole number of minutes")
        .prompt()
        .context("Failed to read refresh interval")?;

    let request_timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.request_timeout_secs)
        .with_help_message(&format!("1 to {MAX_REQUEST_TIMEOUT_SECS}"))
        .with_error_message("Please type a whole number of seconds")
        .prompt()
        .context("Failed to read request timeout")?;

    let api_base_url = Text::new("Open-Meteo API base URL:")
        .with_default(&config.api_base_url)
        .prompt()
        .context("Failed to read API base URL")?;

    config.timezone = timezone;
    config.refresh_interval_mins = refresh_interval_mins;
    config.request_timeout_secs = request_timeout_secs;
    config.api_base_url = api_base_url;

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
