use serde_json::Value;
use thiserror::Error;

/// Failures a weather lookup can end in.
///
/// Each variant maps to one response class at the HTTP boundary, so callers
/// match on the variant rather than on the message text.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Required input was missing or blank.
    #[error("{0}")]
    Validation(String),

    /// Provider credentials are not configured.
    #[error("{0}")]
    Configuration(String),

    /// The provider answered with a non-success status.
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// The request never got a response (DNS, refused connection, timeout).
    #[error("request to weather provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered 2xx with a body of the wrong shape.
    #[error("failed to decode weather provider response: {0}")]
    Decode(String),
}

impl WeatherError {
    pub fn missing_city() -> Self {
        WeatherError::Validation("City is required".to_string())
    }

    /// Status code reported by the provider, if this is an upstream rejection.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            WeatherError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
