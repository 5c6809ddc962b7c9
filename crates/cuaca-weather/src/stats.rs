//! Derived statistics over a reading sequence.

use crate::types::Reading;

/// Min/max/average plus the latest-vs-previous hour delta.
/// Recomputed on demand from whatever sequence is currently in view.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedStats {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub latest: Reading,
    pub previous: Option<Reading>,
    pub delta: f64,
}

/// Compute stats for a sequence of readings. Empty input yields `None`.
pub fn compute(readings: &[Reading]) -> Option<DerivedStats> {
    let latest = readings.last()?.clone();

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for reading in readings {
        min = min.min(reading.temperature_c);
        max = max.max(reading.temperature_c);
        sum += reading.temperature_c;
    }
    let average = sum / readings.len() as f64;

    let previous = readings
        .len()
        .checked_sub(2)
        .map(|i| readings[i].clone());
    let delta = previous
        .as_ref()
        .map(|p| latest.temperature_c - p.temperature_c)
        .unwrap_or(0.0);

    Some(DerivedStats {
        min,
        max,
        average,
        latest,
        previous,
        delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::wire_time;

    fn reading(time: &str, temperature_c: f64) -> Reading {
        Reading {
            time: wire_time::parse(time).unwrap(),
            temperature_c,
        }
    }

    #[test]
    fn empty_sequence_has_no_stats() {
        assert!(compute(&[]).is_none());
    }

    #[test]
    fn single_reading_has_zero_delta_and_no_previous() {
        let stats = compute(&[reading("2024-08-19T00:00", 24.0)]).unwrap();
        assert_eq!(stats.delta, 0.0);
        assert!(stats.previous.is_none());
        assert_eq!(stats.min, 24.0);
        assert_eq!(stats.max, 24.0);
        assert_eq!(stats.average, 24.0);
    }

    #[test]
    fn computes_extrema_average_and_delta() {
        let readings = vec![
            reading("2024-08-19T00:00", 24.0),
            reading("2024-08-19T01:00", 23.5),
            reading("2024-08-19T02:00", 25.0),
        ];
        let stats = compute(&readings).unwrap();

        assert_eq!(stats.min, 23.5);
        assert_eq!(stats.max, 25.0);
        assert!((stats.average - 24.166666666666668).abs() < 1e-12);
        assert_eq!(stats.latest, readings[2]);
        assert_eq!(stats.previous.as_ref(), Some(&readings[1]));
        assert_eq!(stats.delta, 1.5);
    }

    #[test]
    fn average_lies_within_extrema() {
        let readings = vec![
            reading("2024-08-19T00:00", -3.0),
            reading("2024-08-19T01:00", 7.25),
            reading("2024-08-19T02:00", 0.5),
            reading("2024-08-19T03:00", 12.75),
        ];
        let stats = compute(&readings).unwrap();

        for r in &readings {
            assert!(stats.min <= r.temperature_c && r.temperature_c <= stats.max);
        }
        assert!(stats.min <= stats.average && stats.average <= stats.max);
    }

    #[test]
    fn delta_can_be_negative() {
        let readings = vec![
            reading("2024-08-19T00:00", 25.0),
            reading("2024-08-19T01:00", 23.0),
        ];
        let stats = compute(&readings).unwrap();
        assert_eq!(stats.delta, -2.0);
    }
}
