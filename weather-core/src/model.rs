use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One forecast point as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

/// The representative sample chosen for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    #[serde(rename = "temp")]
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

/// Forecast list as returned by the provider, with the city it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastBatch {
    pub city: String,
    pub samples: Vec<RawSample>,
}

/// Success body of a forecast lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub city: String,
    pub days: Vec<DailySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn daily_summary_wire_shape() {
        let day = DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            temperature: 3.5,
            description: "light snow".into(),
            icon: "13d".into(),
        };

        let value = serde_json::to_value(&day).unwrap();
        assert_eq!(
            value,
            json!({ "date": "2024-01-01", "temp": 3.5, "description": "light snow", "icon": "13d" })
        );
    }
}
