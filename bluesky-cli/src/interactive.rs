//! Menu-driven dashboard. Prompts block, so they run on the blocking pool while the
//! refresh loop keeps polling in the background.

use std::{fmt, sync::Arc, time::Duration};

use anyhow::Context;
use bluesky_core::{Dashboard, Location, RefreshOutcome, cities, spawn_refresh_loop};
use inquire::{InquireError, Select, Text};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Refresh,
    Add,
    Remove,
    Quit,
}

impl MenuAction {
    const ALL: [MenuAction; 4] = [
        MenuAction::Refresh,
        MenuAction::Add,
        MenuAction::Remove,
        MenuAction::Quit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuAction::Refresh => "Refresh now",
            MenuAction::Add => "Add location",
            MenuAction::Remove => "Remove location",
            MenuAction::Quit => "Quit",
        })
    }
}

struct LocationChoice(Location);

impl fmt::Display for LocationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.0.name, self.0.id)
    }
}

pub async fn run(dashboard: Arc<Dashboard>, period: Duration) -> anyhow::Result<()> {
    let refresh_loop = spawn_refresh_loop(Arc::clone(&dashboard), period);
    let result = menu(&dashboard).await;
    refresh_loop.shutdown().await;
    result
}

async fn menu(dashboard: &Dashboard) -> anyhow::Result<()> {
    loop {
        println!("{}", render::dashboard(&dashboard.view()));

        let Some(action) =
            prompt(|| Select::new("What next?", MenuAction::ALL.to_vec()).prompt()).await?
        else {
            return Ok(());
        };

        match action {
            MenuAction::Refresh => match dashboard.refresh().await {
                RefreshOutcome::Completed(summary) if summary.failed > 0 => println!(
                    "Refreshed {} locations, {} failed.",
                    summary.fetched, summary.failed
                ),
                RefreshOutcome::Completed(summary) => {
                    println!("Refreshed {} locations.", summary.fetched)
                }
                RefreshOutcome::AlreadyRunning => println!("A refresh is already in progress."),
                RefreshOutcome::Cancelled => return Ok(()),
            },
            MenuAction::Add => {
                let help = format!("Try: {}", cities::supported_names());
                let name =
                    prompt(move || Text::new("City name:").with_help_message(&help).prompt())
                        .await?;
                if let Some(name) = name {
                    match dashboard.add_location(&name) {
                        Ok(location) => println!("Added {}.", location.name),
                        Err(err) => println!("{err}"),
                    }
                }
            }
            MenuAction::Remove => {
                let choices: Vec<_> = dashboard
                    .locations()
                    .into_iter()
                    .map(LocationChoice)
                    .collect();
                if choices.is_empty() {
                    println!("No locations to remove.");
                    continue;
                }

                let choice =
                    prompt(move || Select::new("Remove which location?", choices).prompt())
                        .await?;
                if let Some(LocationChoice(location)) = choice {
                    dashboard.remove_location(location.id);
                    println!("Removed {}.", location.name);
                }
            }
            MenuAction::Quit => return Ok(()),
        }
    }
}

/// Run a blocking prompt. Escape and Ctrl-C come back as `None`.
async fn prompt<T, F>(ask: F) -> anyhow::Result<Option<T>>
where
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(ask)
        .await
        .context("Prompt task failed")?
    {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluesky_core::LocationId;

    #[test]
    fn menu_labels() {
        let labels: Vec<_> = MenuAction::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            labels,
            vec!["Refresh now", "Add location", "Remove location", "Quit"]
        );
    }

    #[test]
    fn location_choice_shows_id() {
        let choice = LocationChoice(Location {
            id: LocationId(3),
            name: "Cardiff".into(),
            lat: 51.4816,
            lon: -3.1791,
        });
        assert_eq!(choice.to_string(), "Cardiff (#3)");
    }
}
