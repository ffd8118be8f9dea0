//! Core library for the weather proxy.
//!
//! This crate defines:
//! - Configuration read from the environment (and an optional config file)
//! - The provider seam and its OpenWeather implementation
//! - The daily forecast reducer
//! - Shared domain models and the error taxonomy
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod service;

pub use config::{Config, Units};
pub use error::WeatherError;
pub use model::{DailyForecast, DailySummary, ForecastBatch, RawSample};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use service::{WeatherService, validate_city};
