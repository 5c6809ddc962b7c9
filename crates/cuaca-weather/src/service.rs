//! Cache-then-network forecast retrieval.
//!
//! `fetch_latest` reads the snapshot cache synchronously so the last-known
//! data can be shown before the network resolves, then performs exactly one
//! network attempt. Consumers observe the sequence through `FetchEvent`s
//! rather than shared mutable view state.

use std::time::Duration;

use crate::cache::SnapshotCache;
use crate::provider::ForecastProvider;
use crate::types::{ForecastMeta, HourlyForecast, Reading};

/// Cache key for the single hourly forecast snapshot.
pub const SNAPSHOT_KEY: &str = "open-meteo:hourly";

/// Result of one fetch cycle, also emitted incrementally as events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastState {
    pub readings: Vec<Reading>,
    pub meta: ForecastMeta,
    pub loading: bool,
    pub error: Option<String>,
}

/// Transitions of a single fetch cycle, in emission order:
/// an optional `CachedShown`, then exactly one of `Fetched` / `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    /// A fresh-enough snapshot exists and should be displayed immediately;
    /// a network attempt still follows.
    CachedShown(HourlyForecast),
    /// The network fetch succeeded and the snapshot was persisted.
    Fetched(HourlyForecast),
    /// The network fetch failed. `snapshot_shown` is true when a snapshot
    /// that passed the freshness check is already on display; the error is
    /// then suppressed from view state.
    Failed {
        message: String,
        snapshot_shown: bool,
    },
}

pub struct ForecastService {
    provider: ForecastProvider,
    cache: SnapshotCache,
    max_snapshot_age: Duration,
}

impl ForecastService {
    pub fn new(provider: ForecastProvider, cache: SnapshotCache, max_snapshot_age: Duration) -> Self {
        Self {
            provider,
            cache,
            max_snapshot_age,
        }
    }

    /// Read the snapshot cache, applying the freshness check.
    pub fn cached(&self) -> Option<HourlyForecast> {
        self.cache.load(SNAPSHOT_KEY, self.max_snapshot_age)
    }

    /// Run one fetch cycle: snapshot first, then the network.
    ///
    /// A network failure is surfaced in the returned state only when no
    /// fresh snapshot was shown in step one; a displayed snapshot wins
    /// silently. There is no retry; a manual reload re-runs the cycle.
    pub async fn fetch_latest<F: FnMut(FetchEvent)>(&self, mut on_event: F) -> ForecastState {
        let mut state = ForecastState {
            loading: true,
            ..ForecastState::default()
        };

        let snapshot_shown = match self.cached() {
            Some(snapshot) => {
                tracing::debug!(
                    "Showing cached snapshot with {} readings while fetching",
                    snapshot.readings.len()
                );
                state.readings = snapshot.readings.clone();
                state.meta = snapshot.meta.clone();
                on_event(FetchEvent::CachedShown(snapshot));
                true
            }
            None => false,
        };

        match self.provider.fetch_hourly().await {
            Ok(forecast) => {
                self.cache.save(SNAPSHOT_KEY, &forecast);
                state.readings = forecast.readings.clone();
                state.meta = forecast.meta.clone();
                state.error = None;
                state.loading = false;
                tracing::info!("Fetched {} hourly readings", forecast.readings.len());
                on_event(FetchEvent::Fetched(forecast));
            }
            Err(e) => {
                tracing::warn!("Forecast fetch failed: {}", e);
                state.loading = false;
                let message = e.user_message().to_string();
                if !snapshot_shown {
                    state.error = Some(message.clone());
                }
                on_event(FetchEvent::Failed {
                    message,
                    snapshot_shown,
                });
            }
        }

        state
    }
}
