//! Offline shell cache for cuaca
//!
//! Runs outside the dashboard session and shares no state with it: a
//! versioned store of shell assets plus the last successful forecast
//! response, with two-tier fetch routing (network-first for the volatile
//! forecast endpoint, cache-first for static shell assets).

pub mod store;
pub mod worker;

pub use store::{ShellStore, StoreError, StoredResponse};
pub use worker::{is_forecast_request, OfflineError, ShellWorker, BASE_URL_TOKEN};
