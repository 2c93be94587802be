use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use skycast_core::{Config, WeatherClient, WeatherController, WeatherStore};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the dashboard for a city name.
    City {
        /// City name, e.g. "London" or "Tokyo".
        name: String,
    },

    /// Show the dashboard for a coordinate pair.
    Coords {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Prompt for city names in a loop.
    Interactive,

    /// Point the CLI at a different backend URL.
    Configure {
        /// Backend base URL, e.g. "http://localhost:8081".
        backend_url: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { backend_url } => configure(backend_url),
            Command::City { name } => one_shot(Some(&name), None, None).await,
            Command::Coords { lat, lon } => one_shot(None, Some(lat), Some(lon)).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure(backend_url: String) -> Result<()> {
    let mut config = Config::load()?;
    config.set_backend_url(backend_url);
    config.save()?;
    println!("Backend set to {}", config.backend_url());
    Ok(())
}

fn build_controller() -> Result<WeatherController> {
    let config = Config::load()?;
    tracing::debug!(backend = config.backend_url(), "using weather backend");
    let client = WeatherClient::from_config(&config)?;
    let store = Arc::new(WeatherStore::new());
    Ok(WeatherController::new(store, Box::new(client)))
}

/// Print the loading indicator off store transitions, like the browser
/// UI's spinner.
fn spawn_loading_indicator(controller: &WeatherController) -> tokio::task::JoinHandle<()> {
    let mut rx = controller.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            if rx.borrow_and_update().loading {
                println!("Loading weather data...");
            }
        }
    })
}

async fn one_shot(city: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> Result<()> {
    let controller = build_controller()?;
    let indicator = spawn_loading_indicator(&controller);

    submit_and_render(&controller, city, lat, lon).await;

    indicator.abort();
    Ok(())
}

async fn interactive() -> Result<()> {
    let controller = build_controller()?;
    let indicator = spawn_loading_indicator(&controller);

    loop {
        let city = inquire::Text::new("City name (empty to quit):").prompt()?;
        if city.trim().is_empty() {
            break;
        }
        submit_and_render(&controller, Some(&city), None, None).await;
    }

    controller.clear();
    indicator.abort();
    Ok(())
}

async fn submit_and_render(
    controller: &WeatherController,
    city: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
) {
    match controller.submit_query(city, lat, lon).await {
        Ok(()) => render::render_state(&controller.state()),
        Err(err) => println!("{err}"),
    }
}
