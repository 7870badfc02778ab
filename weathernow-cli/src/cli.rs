use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use std::process::ExitCode;
use tracing::debug;
use weathernow_core::{
    Config, LocationQuery, OpenWeatherProvider, WeatherSession, geolocator_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Current weather for any city, or wherever you are")]
pub struct Cli {
    /// Log request details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeather API key and location preferences.
    Configure,

    /// Show current weather for a city name or a "<lat>,<lon>" pair.
    Show {
        /// City name, or latitude and longitude separated by a comma.
        location: String,

        /// Print the reading as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show current weather for your own location.
    Here {
        /// Print the reading as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search repeatedly from a prompt.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, json } => {
                let provider = load_provider()?;
                let mut session = WeatherSession::new();
                session.search(&provider, &location).await;
                report(&session, json)
            }
            Command::Here { json } => {
                let config = load_config()?;
                let provider = OpenWeatherProvider::from_config(&config)?;
                let geolocator = geolocator_from_config(&config);

                let mut session = WeatherSession::new();
                session.use_my_location(&provider, geolocator.as_deref()).await;
                report(&session, json)
            }
            Command::Interactive => interactive().await,
        }
    }
}

fn load_config() -> Result<Config> {
    let config = Config::load()?.with_env_overrides();
    debug!(
        has_api_key = config.api_key().is_some(),
        ip_lookup = config.location.use_ip_lookup,
        "Loaded configuration"
    );
    Ok(config)
}

fn load_provider() -> Result<OpenWeatherProvider> {
    OpenWeatherProvider::from_config(&load_config()?)
}

/// Print the session's reading or its error banner.
fn report(session: &WeatherSession, json: bool) -> Result<ExitCode> {
    if let Some(reading) = session.reading() {
        if json {
            let out =
                serde_json::to_string_pretty(reading).context("Failed to serialize reading")?;
            println!("{out}");
        } else {
            print!("{}", render::card(reading));
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(message) = session.error_message() {
        eprintln!("{}", render::banner(&message));
    }
    Ok(ExitCode::FAILURE)
}

fn configure() -> Result<ExitCode> {
    let mut config = Config::load()?;

    let help = if config.api_key().is_some() {
        "Leave blank to keep the current key"
    } else {
        "Get one at https://openweathermap.org/api"
    };
    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message(help)
        .prompt()?;
    if !key.trim().is_empty() {
        config.set_api_key(key.trim().to_string());
    }

    config.location.use_ip_lookup = Confirm::new("Find your location from your IP address?")
        .with_default(config.location.use_ip_lookup)
        .with_help_message("Used by `weathernow here`; sends a request to ip-api.com")
        .prompt()?;

    let home = Text::new("Home coordinates (<lat>,<lon>):")
        .with_help_message("Optional; takes precedence over the IP lookup. Leave blank to skip")
        .prompt()?;
    if !home.trim().is_empty() {
        match LocationQuery::parse(&home)? {
            LocationQuery::Coordinates(pos) => {
                config.location.latitude = Some(pos.latitude);
                config.location.longitude = Some(pos.longitude);
            }
            LocationQuery::Place(_) => {
                anyhow::bail!("Home location must be coordinates, e.g. 51.5,-0.12");
            }
        }
    }

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn interactive() -> Result<ExitCode> {
    let config = load_config()?;
    let provider = OpenWeatherProvider::from_config(&config)?;
    let geolocator = geolocator_from_config(&config);
    let mut session = WeatherSession::new();

    loop {
        let input = match Text::new("City:")
            .with_help_message(":here uses your location, :quit or Esc exits")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        match input.trim() {
            ":quit" | ":q" => break,
            ":here" => {
                session.use_my_location(&provider, geolocator.as_deref()).await;
            }
            _ => {
                session.search(&provider, &input).await;
            }
        }

        report(&session, false)?;
        session.dismiss_error();
        println!();
    }

    Ok(ExitCode::SUCCESS)
}
