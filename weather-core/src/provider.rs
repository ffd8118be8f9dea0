use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{error::WeatherError, model::ForecastBatch};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Upstream weather source. One call issues at most one outbound request.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions, passed through exactly as the provider sent them.
    async fn fetch_current(&self, city: &str) -> Result<Value, WeatherError>;

    /// The provider's flat list of timestamped forecast samples.
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastBatch, WeatherError>;
}
