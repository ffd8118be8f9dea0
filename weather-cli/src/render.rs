//! Plain-text rendering of lookup results.

use serde_json::Value;
use std::fmt::Write;
use weather_core::{DailyForecast, Units};

/// Current conditions as printed, from the provider's raw current-weather body.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub name: String,
    pub temp: f64,
    pub feels_like: f64,
    pub description: String,
    pub humidity: Option<i64>,
    pub wind_speed: Option<f64>,
}

impl CurrentView {
    pub fn from_value(body: &Value) -> Option<Self> {
        let main = body.get("main")?;

        Some(Self {
            name: body
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown location")
                .to_string(),
            temp: main.get("temp")?.as_f64()?,
            feels_like: main.get("feels_like").and_then(Value::as_f64)?,
            description: body
                .pointer("/weather/0/description")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
            humidity: main.get("humidity").and_then(Value::as_i64),
            wind_speed: body.pointer("/wind/speed").and_then(Value::as_f64),
        })
    }
}

/// Round for display; `-0` prints as `0`.
fn rounded(value: f64) -> f64 {
    value.round() + 0.0
}

pub fn format_current(view: &CurrentView, units: Units) -> String {
    let deg = units.temperature_suffix();
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.name);
    let _ = writeln!(
        out,
        "  Temp:      {}{deg} (feels like {}{deg})",
        rounded(view.temp),
        rounded(view.feels_like)
    );
    let _ = writeln!(out, "  Condition: {}", view.description);
    if let Some(humidity) = view.humidity {
        let _ = writeln!(out, "  Humidity:  {humidity}%");
    }
    if let Some(speed) = view.wind_speed {
        let _ = writeln!(out, "  Wind:      {speed} {}", units.speed_suffix());
    }

    out
}

pub fn format_forecast(forecast: &DailyForecast, units: Units) -> String {
    let deg = units.temperature_suffix();
    let mut out = String::new();

    let _ = writeln!(out, "Forecast for {}", forecast.city);
    if forecast.days.is_empty() {
        let _ = writeln!(out, "  (no forecast data)");
        return out;
    }

    for day in &forecast.days {
        let _ = writeln!(
            out,
            "  {} {:<3}  {:>5}{deg}  {}",
            day.date.format("%Y-%m-%d"),
            day.date.format("%a"),
            rounded(day.temperature),
            day.description
        );
    }

    out
}
