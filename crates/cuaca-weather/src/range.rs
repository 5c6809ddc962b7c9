//! Calendar-day range filtering of reading sequences.

use chrono::NaiveDate;

use crate::types::Reading;

/// Inclusive calendar-day window. Absent bounds fall back to the extremes
/// of the sequence being filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: Some(day),
            end: Some(day),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Restrict readings to `[start 00:00:00, end 23:59:59]`, preserving order.
/// An unbounded range returns the input unchanged.
pub fn filter_range(readings: &[Reading], range: &DateRange) -> Vec<Reading> {
    if readings.is_empty() || range.is_unbounded() {
        return readings.to_vec();
    }

    // Bounds always exist here: the sequence is non-empty
    let first = readings[0].time;
    let last = readings[readings.len() - 1].time;

    let start = range
        .start
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(first);
    let end = range
        .end
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap_or(last);

    readings
        .iter()
        .filter(|r| r.time >= start && r.time <= end)
        .cloned()
        .collect()
}
