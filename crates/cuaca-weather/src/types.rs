use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Temperature unit for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Unit letter as rendered after the degree symbol
    pub fn letter(&self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

/// One hourly temperature reading, ordered as delivered by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(with = "wire_time")]
    pub time: NaiveDateTime,
    pub temperature_c: f64,
}

/// Reporting timezone of a fetched series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastMeta {
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
}

/// A normalized forecast: the reading sequence plus its timezone metadata.
/// This is the payload persisted by the snapshot cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub readings: Vec<Reading>,
    pub meta: ForecastMeta,
}

/// Raw Open-Meteo response shape.
/// `time` and `temperature_2m` are index-aligned parallel arrays.
#[derive(Debug, Deserialize)]
pub struct HourlyResponse {
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub hourly: HourlyBlock,
    #[serde(default)]
    pub hourly_units: Option<HourlyUnits>,
}

#[derive(Debug, Deserialize)]
pub struct HourlyBlock {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HourlyUnits {
    pub time: Option<String>,
    pub temperature_2m: Option<String>,
}

/// Forecast pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Forecast API returned HTTP {status}")]
    Status { status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Display message for the single user-visible "failed to load" condition.
    /// Network and parse failures are not distinguished further than this.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Network(_) => "Failed to load forecast data. Check your connection.",
            WeatherError::Status { .. } => "Failed to load forecast data. The service returned an error.",
            WeatherError::Parse(_) => "Failed to load forecast data. The response was malformed.",
        }
    }
}

/// Open-Meteo delivers local timestamps as `2024-08-19T14:00`; snapshots
/// round-trip through the same format. Seconds are tolerated on input.
pub(crate) mod wire_time {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M";

    pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
    }

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}
