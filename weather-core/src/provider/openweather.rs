use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    config::{Config, ENV_API_KEY, Units},
    error::WeatherError,
    model::{ForecastBatch, RawSample},
};

use super::WeatherProvider;

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    units: Units,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Build a provider from config. A missing API key is not an error here;
    /// every lookup fails with [`WeatherError::Configuration`] instead.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build OpenWeather HTTP client")?;

        Ok(Self {
            api_key: config.require_api_key().ok().map(str::to_owned),
            units: config.units,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn api_key(&self) -> Result<&str, WeatherError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| WeatherError::Configuration(format!("Missing {ENV_API_KEY}")))
    }

    async fn get(&self, endpoint: &str, city: &str) -> Result<Response, WeatherError> {
        let api_key = self.api_key()?;
        let url = format!("{}/{endpoint}", self.base_url);

        tracing::debug!(%url, city, units = %self.units, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", self.units.as_str()),
                ("appid", api_key),
            ])
            .send()
            .await?;

        Ok(res)
    }

    /// Read the body and turn a non-success status into [`WeatherError::Upstream`].
    async fn read_json(res: Response, fallback_message: &str) -> Result<Value, WeatherError> {
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let details = serde_json::from_str::<Value>(&body).ok();
            let message = details
                .as_ref()
                .and_then(|d| d.get("message"))
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(fallback_message)
                .to_string();

            tracing::warn!(
                status = status.as_u16(),
                %message,
                "OpenWeather rejected request"
            );

            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                message,
                details,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::Decode(format!("{e}: {}", truncate_body(&body))))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: Option<String>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: Option<OwCity>,
    list: Vec<OwForecastEntry>,
}

impl OwForecastEntry {
    fn into_sample(self) -> Result<RawSample, WeatherError> {
        let timestamp = match self.dt_txt.as_deref() {
            Some(txt) => NaiveDateTime::parse_from_str(txt, DT_TXT_FORMAT)
                .map_err(|e| WeatherError::Decode(format!("bad dt_txt '{txt}': {e}")))?,
            None => unix_to_naive(self.dt)
                .ok_or_else(|| WeatherError::Decode(format!("bad dt {}", self.dt)))?,
        };

        let (description, icon) = match self.weather.into_iter().next() {
            Some(w) => (w.description, w.icon),
            None => ("Unknown".to_string(), String::new()),
        };

        Ok(RawSample {
            timestamp,
            temperature: self.main.temp,
            description,
            icon,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, city: &str) -> Result<Value, WeatherError> {
        let res = self.get("weather", city).await?;
        Self::read_json(res, "OpenWeather request failed").await
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastBatch, WeatherError> {
        let res = self.get("forecast", city).await?;
        let body = Self::read_json(res, "Forecast failed").await?;

        let parsed: OwForecastResponse = serde_json::from_value(body)
            .map_err(|e| WeatherError::Decode(format!("forecast body: {e}")))?;

        let samples = parsed
            .list
            .into_iter()
            .map(OwForecastEntry::into_sample)
            .collect::<Result<Vec<_>, _>>()?;

        let city = parsed
            .city
            .map(|c| c.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| city.to_string());

        tracing::debug!(%city, samples = samples.len(), "OpenWeather forecast received");

        Ok(ForecastBatch { city, samples })
    }
}

fn unix_to_naive(ts: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.naive_utc())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
