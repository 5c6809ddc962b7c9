//! Dashboard view state.
//!
//! All loading/error/data display state lives in one explicit object,
//! updated only through the fetch cycle's defined transitions. Events that
//! arrive from a superseded fetch are discarded by generation check, so a
//! consumer that moved on is never mutated by a late completion.

use cuaca_weather::{
    compute, filter_range, DateRange, DerivedStats, FetchEvent, ForecastMeta, Reading,
    TemperatureUnit,
};

/// Display phase of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    phase: Phase,
    readings: Vec<Reading>,
    meta: ForecastMeta,
    error: Option<String>,
    unit: TemperatureUnit,
    range: DateRange,
    generation: u64,
}

impl DashboardState {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self {
            phase: Phase::Idle,
            readings: Vec::new(),
            meta: ForecastMeta::default(),
            error: None,
            unit,
            range: DateRange::unbounded(),
            generation: 0,
        }
    }

    /// Start a new fetch cycle, superseding any earlier one.
    /// Returns the generation token the cycle's events must carry.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.error = None;
        self.generation
    }

    /// Apply one fetch transition. Events carrying a stale generation are
    /// dropped without touching the state.
    pub fn apply(&mut self, generation: u64, event: FetchEvent) {
        if generation != self.generation {
            tracing::debug!("Discarding fetch event from superseded generation {}", generation);
            return;
        }

        match event {
            FetchEvent::CachedShown(snapshot) => {
                // Last-known data goes up immediately; the phase stays
                // Loading because a network attempt is still in flight.
                self.readings = snapshot.readings;
                self.meta = snapshot.meta;
            }
            FetchEvent::Fetched(forecast) => {
                self.readings = forecast.readings;
                self.meta = forecast.meta;
                self.error = None;
                self.phase = Phase::Ready;
            }
            FetchEvent::Failed {
                message,
                snapshot_shown,
            } => {
                if snapshot_shown {
                    self.phase = Phase::Ready;
                } else {
                    self.error = Some(message);
                    self.phase = Phase::Failed;
                }
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn meta(&self) -> &ForecastMeta {
        &self.meta
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Date filtering acts on view state only; fetched readings are kept
    /// intact so clearing the filter restores the full series.
    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    /// All fetched readings, unfiltered.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// The readings currently in view, after the date-range filter.
    pub fn visible_readings(&self) -> Vec<Reading> {
        filter_range(&self.readings, &self.range)
    }

    /// Stats over the sequence currently in view.
    pub fn stats(&self) -> Option<DerivedStats> {
        compute(&self.visible_readings())
    }
}
