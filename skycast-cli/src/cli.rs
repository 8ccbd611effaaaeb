use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use skycast_core::{App, AppState, OpenMeteo, SourceStore, SystemLocator};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather for your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up weather for a city, bypassing the remembered location.
    Search {
        /// City name; prompts interactively when omitted.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let store = SourceStore::new()?;
        let mut app = App::new(OpenMeteo::new(), store, Box::new(SystemLocator));

        match self.command {
            None => app.initialize().await,
            Some(Command::Search { city }) => {
                app.open_search();
                if let Some(city) = city {
                    app.city_select(&city).await;
                }
            }
        }

        drive(&mut app).await
    }
}

/// Pump the state machine until the flow lands on a rendered snapshot or the
/// user quits.
async fn drive(app: &mut App) -> Result<()> {
    loop {
        let state = app.state().clone();
        match state {
            AppState::Ready(snapshot) => {
                render::snapshot(&snapshot);
                return Ok(());
            }
            AppState::Searching { notice } => {
                if let Some(notice) = notice {
                    eprintln!("{notice}");
                }
                let city = Text::new("City name:")
                    .with_help_message("e.g. Dhaka, London")
                    .prompt()?;
                app.city_select(&city).await;
            }
            AppState::Error(message) => {
                eprintln!("Error: {message}");
                let choice =
                    Select::new("What next?", vec!["Retry", "Search city", "Quit"]).prompt()?;
                match choice {
                    "Retry" => app.retry().await,
                    "Search city" => app.open_search(),
                    _ => return Ok(()),
                }
            }
            // Transient states; initialize() always moves past them.
            AppState::Initializing | AppState::AwaitingPermission | AppState::Loading => {
                app.initialize().await;
            }
        }
    }
}
