//! Hourly forecast pipeline for cuaca
//!
//! Fetches hourly temperature data from Open-Meteo, caches the last
//! successful response with a read-time freshness check, and derives the
//! statistics the dashboard displays.

pub mod cache;
pub mod provider;
pub mod range;
pub mod service;
pub mod stats;
pub mod types;
pub mod units;

pub use cache::SnapshotCache;
pub use provider::ForecastProvider;
pub use range::{filter_range, DateRange};
pub use service::{FetchEvent, ForecastService, ForecastState, SNAPSHOT_KEY};
pub use stats::{compute, DerivedStats};
pub use types::*;
pub use units::{celsius_to_fahrenheit, fahrenheit_to_celsius, format_delta, format_temperature};
