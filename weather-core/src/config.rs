use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf};

use crate::error::WeatherError;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_PORT: &str = "PORT";
pub const ENV_UNITS: &str = "OPENWEATHER_UNITS";
pub const ENV_BASE_URL: &str = "OPENWEATHER_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "WEATHER_HTTP_TIMEOUT_SECS";

/// Unit system requested from the provider. Values are passed through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Standard => "m/s",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial, standard."
            )),
        }
    }
}

/// Process-wide settings, read once at startup and handed to the provider.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// port = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub port: u16,
    pub units: Units,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            port: DEFAULT_PORT,
            units: Units::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Config file (if any) overlaid with the process environment.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from `lookup` (normally the process environment).
    /// Blank values are treated as unset.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key.trim().to_string());
        }

        if let Some(port) = get(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT} must be a port number, got '{port}'"))?;
        }

        if let Some(units) = get(ENV_UNITS) {
            self.units = Units::try_from(units.as_str())
                .with_context(|| format!("Invalid {ENV_UNITS}"))?;
        }

        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url.trim().to_string();
        }

        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = secs.trim().parse().with_context(|| {
                format!("{ENV_TIMEOUT_SECS} must be a number of seconds, got '{secs}'")
            })?;
        }

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn require_api_key(&self) -> Result<&str, WeatherError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| WeatherError::Configuration(format!("Missing {ENV_API_KEY}")))
    }

    /// Set or replace the provider API key.
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let mut cfg = Config::default();
        cfg.apply_overrides(env(&[])).unwrap();

        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn environment_overrides_everything() {
        let mut cfg = Config::default();
        cfg.apply_overrides(env(&[
            (ENV_API_KEY, "KEY"),
            (ENV_PORT, "8080"),
            (ENV_UNITS, "Imperial"),
            (ENV_BASE_URL, "http://localhost:9999"),
            (ENV_TIMEOUT_SECS, "2"),
        ]))
        .unwrap();

        assert_eq!(cfg.require_api_key().unwrap(), "KEY");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.units, Units::Imperial);
        assert_eq!(cfg.base_url, "http://localhost:9999");
        assert_eq!(cfg.timeout_secs, 2);
    }

    #[test]
    fn environment_wins_over_file() {
        let mut cfg = Config::from_toml("api_key = \"FROM_FILE\"\nport = 7000\n").unwrap();
        cfg.apply_overrides(env(&[(ENV_API_KEY, "FROM_ENV")])).unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("FROM_ENV"));
        assert_eq!(cfg.port, 7000);
    }

    #[test]
    fn blank_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.apply_overrides(env(&[(ENV_API_KEY, "   "), (ENV_PORT, "")]))
            .unwrap();

        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg.apply_overrides(env(&[(ENV_PORT, "abc")])).unwrap_err();
        assert!(err.to_string().contains("PORT must be a port number"));
    }

    #[test]
    fn invalid_units_are_rejected() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_overrides(env(&[(ENV_UNITS, "kelvinish")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("Unknown units"));
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        assert!(matches!(err, WeatherError::Configuration(_)));
        assert!(err.to_string().contains(ENV_API_KEY));
    }

    #[test]
    fn units_as_str_roundtrip() {
        for units in Units::all() {
            let parsed = Units::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
    }

    #[test]
    fn toml_roundtrip_keeps_key_and_units() {
        let mut cfg = Config::default();
        cfg.set_api_key(" KEY ".into());
        cfg.units = Units::Standard;

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed = Config::from_toml(&text).unwrap();

        assert_eq!(parsed, cfg);
        assert_eq!(parsed.api_key.as_deref(), Some("KEY"));
    }
}
