use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::WeatherError,
    forecast,
    model::DailyForecast,
    provider::WeatherProvider,
};

/// Trim `city`, rejecting blank input before anything touches the network.
pub fn validate_city(city: &str) -> Result<&str, WeatherError> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::missing_city());
    }
    Ok(trimmed)
}

/// Request-scoped entry point shared by the HTTP server and the CLI.
#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub async fn current(&self, city: &str) -> Result<Value, WeatherError> {
        let city = validate_city(city)?;
        self.provider.fetch_current(city).await
    }

    pub async fn forecast(&self, city: &str) -> Result<DailyForecast, WeatherError> {
        let city = validate_city(city)?;
        let batch = self.provider.fetch_forecast(city).await?;

        let days = forecast::reduce(&batch.samples);
        tracing::debug!(
            city = %batch.city,
            samples = batch.samples.len(),
            days = days.len(),
            "forecast reduced"
        );

        Ok(DailyForecast {
            city: batch.city,
            days,
        })
    }
}
