use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use weather_core::{
    Config, DailyForecast, OpenWeatherProvider, Units, WeatherError, WeatherService,
    validate_city,
};

use crate::render::{self, CurrentView};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// Show current weather and the daily forecast for a city.
    Show {
        /// City name; prompted for when omitted.
        city: Option<String>,
    },

    /// Show only the daily forecast for a city.
    Forecast {
        /// City name.
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let city = match city {
                    Some(city) => city,
                    None => Text::new("City:")
                        .with_placeholder("Try: London")
                        .prompt()
                        .context("Failed to read city")?,
                };
                show(&city).await
            }
            Command::Forecast { city } => forecast(&city).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    let starting = Units::all()
        .iter()
        .position(|u| *u == config.units)
        .unwrap_or(0);
    let units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(starting)
        .prompt()
        .context("Failed to read units")?;

    config.set_api_key(api_key);
    config.units = units;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn service(config: &Config) -> anyhow::Result<WeatherService> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(WeatherService::new(Arc::new(provider)))
}

async fn show(city: &str) -> anyhow::Result<()> {
    let city = validate_city(city).map_err(|_| anyhow::anyhow!("Please enter a city."))?;
    let config = Config::load()?;
    let service = service(&config)?;

    eprintln!("Loading...");
    let (current, forecast) = tokio::join!(service.current(city), service.forecast(city));

    let report = render_report(current, forecast, config.units)?;
    print!("{report}");

    Ok(())
}

/// Both lookups must succeed before anything is printed.
fn render_report(
    current: Result<serde_json::Value, WeatherError>,
    forecast: Result<DailyForecast, WeatherError>,
    units: Units,
) -> anyhow::Result<String> {
    let current = current.map_err(describe)?;
    let forecast = forecast.map_err(describe)?;

    let view = CurrentView::from_value(&current)
        .context("Unexpected current weather response from provider")?;

    Ok(format!(
        "{}\n{}",
        render::format_current(&view, units),
        render::format_forecast(&forecast, units)
    ))
}

async fn forecast(city: &str) -> anyhow::Result<()> {
    let city = validate_city(city).map_err(|_| anyhow::anyhow!("Please enter a city."))?;
    let config = Config::load()?;

    let forecast = service(&config)?.forecast(city).await.map_err(describe)?;
    print!("{}", render::format_forecast(&forecast, config.units));

    Ok(())
}

/// Turn a lookup failure into the message a user should see.
fn describe(err: WeatherError) -> anyhow::Error {
    match err {
        WeatherError::Configuration(detail) => anyhow::anyhow!(
            "{detail}.\nHint: run `weather configure` or set it in the environment."
        ),
        WeatherError::Transport(e) => {
            tracing::debug!(error = ?e, "transport failure");
            anyhow::anyhow!("Network error: could not reach the weather provider.")
        }
        other => anyhow::Error::new(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_city_is_optional() {
        let cli = Cli::try_parse_from(["weather", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: None }));

        let cli = Cli::try_parse_from(["weather", "show", "New York"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: Some(c) } if c == "New York"));
    }

    #[test]
    fn forecast_requires_city() {
        assert!(Cli::try_parse_from(["weather", "forecast"]).is_err());
    }

    #[test]
    fn configuration_error_gets_hint() {
        let err = describe(WeatherError::Configuration("Missing OPENWEATHER_API_KEY".into()));
        assert!(err.to_string().contains("weather configure"));
    }

    #[test]
    fn report_fails_whole_when_forecast_fails() {
        let current = Ok(serde_json::json!({
            "name": "Oslo",
            "main": { "temp": 1.0, "feels_like": -2.0 }
        }));
        let forecast = Err(WeatherError::Upstream {
            status: 500,
            message: "Forecast failed".into(),
            details: None,
        });

        let err = render_report(current, forecast, Units::Metric).unwrap_err();
        assert_eq!(err.to_string(), "Forecast failed");
    }

    #[test]
    fn report_has_current_then_forecast() {
        let current = Ok(serde_json::json!({
            "name": "Oslo",
            "main": { "temp": 1.0, "feels_like": -2.0 }
        }));
        let forecast = Ok(DailyForecast {
            city: "Oslo".into(),
            days: vec![],
        });

        let report = render_report(current, forecast, Units::Metric).unwrap();
        assert!(report.starts_with("Oslo\n"));
        assert!(report.contains("\nForecast for Oslo\n"));
    }

    #[test]
    fn upstream_error_keeps_provider_message() {
        let err = describe(WeatherError::Upstream {
            status: 404,
            message: "city not found".into(),
            details: None,
        });
        assert_eq!(err.to_string(), "city not found");
    }
}
