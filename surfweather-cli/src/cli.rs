use anyhow::anyhow;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Select};
use surfweather_core::{CitySearch, Config, ForecastClient, ForecastProvider, GeocodeClient};

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "surfweather",
    version,
    about = "Wetter für Wassersport in Deutschland"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the forecast for a city and exit.
    Show {
        /// City name, e.g. "Chemnitz".
        city: String,
    },

    /// Pick a city and store it as the start-up default.
    DefaultCity {
        /// City name to search for.
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            None => session::run(config).await,
            Some(Command::Show { city }) => show(&config, &city).await,
            Some(Command::DefaultCity { city }) => set_default_city(config, &city).await,
        }
    }
}

async fn show(config: &Config, city: &str) -> anyhow::Result<()> {
    let location = first_candidate(config, city).await?;
    let model = ForecastClient::new()?.fetch(&location).await?;
    render::render_forecast(&location, &model, 0);
    Ok(())
}

async fn set_default_city(mut config: Config, city: &str) -> anyhow::Result<()> {
    let geocode = GeocodeClient::new(config.language())?;
    let candidates = geocode.search(city.trim()).await?;
    if candidates.is_empty() {
        return Err(anyhow!("Keine Stadt gefunden: {city}"));
    }

    let chosen = match Select::new("Stadt auswählen:", candidates).prompt() {
        Ok(location) => location,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    println!("Standardstadt: {chosen}");
    config.set_default_city(chosen);
    config.save()
}

async fn first_candidate(
    config: &Config,
    city: &str,
) -> anyhow::Result<surfweather_core::Location> {
    let geocode = GeocodeClient::new(config.language())?;
    let mut candidates = geocode.search(city.trim()).await?;
    if candidates.is_empty() {
        return Err(anyhow!("Keine Stadt gefunden: {city}"));
    }
    Ok(candidates.remove(0))
}
