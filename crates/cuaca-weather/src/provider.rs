//! Open-Meteo hourly forecast client.

use crate::types::{wire_time, ForecastMeta, HourlyForecast, HourlyResponse, Reading, WeatherError};
use reqwest::Client;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ForecastProvider {
    client: Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
}

impl ForecastProvider {
    pub fn new(base_url: &str, latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            latitude,
            longitude,
        })
    }

    fn forecast_url(&self) -> String {
        format!(
            "{}/v1/forecast?latitude={}&longitude={}&hourly=temperature_2m&timezone=auto",
            self.base_url, self.latitude, self.longitude
        )
    }

    /// Fetch and normalize the hourly temperature series.
    ///
    /// Intermediate HTTP caches are bypassed; the snapshot cache is the
    /// only cache layer in this pipeline.
    pub async fn fetch_hourly(&self) -> Result<HourlyForecast, WeatherError> {
        let url = self.forecast_url();
        tracing::debug!("Fetching hourly forecast from {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Forecast request failed with HTTP {}", status);
            return Err(WeatherError::Status {
                status: status.as_u16(),
            });
        }

        let body: HourlyResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        normalize(body)
    }
}

/// Pair the parallel `time`/`temperature_2m` arrays into readings.
/// Mismatched lengths are truncated to the shorter array.
fn normalize(body: HourlyResponse) -> Result<HourlyForecast, WeatherError> {
    let times = &body.hourly.time;
    let temps = &body.hourly.temperature_2m;
    if times.len() != temps.len() {
        tracing::warn!(
            "Hourly arrays disagree on length ({} times, {} temperatures), truncating",
            times.len(),
            temps.len()
        );
    }

    let readings = times
        .iter()
        .zip(temps.iter())
        .map(|(t, &temperature_c)| {
            let time = wire_time::parse(t)
                .map_err(|e| WeatherError::Parse(format!("bad timestamp {t:?}: {e}")))?;
            Ok(Reading {
                time,
                temperature_c,
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    Ok(HourlyForecast {
        readings,
        meta: ForecastMeta {
            timezone: body.timezone,
            timezone_abbreviation: body.timezone_abbreviation,
        },
    })
}
