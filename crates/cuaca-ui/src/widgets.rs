//! View models for the dashboard widgets.
//!
//! The chart widget is a black box that consumes label/value pairs; the
//! stat cards and table consume preformatted strings. Everything here is a
//! pure projection of view state.

use cuaca_weather::{
    format_delta, format_temperature, units, DerivedStats, Reading, TemperatureUnit,
};

use crate::format;

/// One stat card: a label, a formatted value, and an optional sub-line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub sub: Option<String>,
}

/// The four dashboard cards: current, average, maximum, last-hour change.
pub fn stat_cards(stats: &DerivedStats, unit: TemperatureUnit, latest_sub: &str) -> Vec<StatCard> {
    vec![
        StatCard {
            label: "Current temperature".into(),
            value: format_temperature(stats.latest.temperature_c, unit),
            sub: Some(latest_sub.to_string()),
        },
        StatCard {
            label: "Average".into(),
            value: format_temperature(stats.average, unit),
            sub: None,
        },
        StatCard {
            label: "Maximum".into(),
            value: format_temperature(stats.max, unit),
            sub: None,
        },
        StatCard {
            label: "Change (last hour)".into(),
            value: format_delta(stats.delta, unit),
            sub: None,
        },
    ]
}

/// One point of the chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Project readings into the chart's label/value pairs, converted to the
/// display unit.
pub fn chart_series(readings: &[Reading], unit: TemperatureUnit) -> Vec<ChartPoint> {
    readings
        .iter()
        .map(|r| ChartPoint {
            label: format::hour_label(r.time),
            value: match unit {
                TemperatureUnit::Celsius => r.temperature_c,
                TemperatureUnit::Fahrenheit => units::celsius_to_fahrenheit(r.temperature_c),
            },
        })
        .collect()
}

/// One row of the hourly table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub time: String,
    pub value: String,
}

pub fn table_rows(readings: &[Reading], unit: TemperatureUnit) -> Vec<TableRow> {
    readings
        .iter()
        .map(|r| TableRow {
            time: format::long_label(r.time),
            value: format_temperature(r.temperature_c, unit),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use cuaca_weather::compute;

    fn reading(time: &str, temperature_c: f64) -> Reading {
        Reading {
            time: NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M").unwrap(),
            temperature_c,
        }
    }

    fn readings() -> Vec<Reading> {
        vec![
            reading("2024-08-19T00:00", 24.0),
            reading("2024-08-19T01:00", 23.5),
            reading("2024-08-19T02:00", 25.0),
        ]
    }

    #[test]
    fn four_cards_in_display_order() {
        let stats = compute(&readings()).unwrap();
        let cards = stat_cards(&stats, TemperatureUnit::Celsius, "Monday, 19 August 2024 02:00");

        let labels: Vec<&str> = cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Current temperature",
                "Average",
                "Maximum",
                "Change (last hour)"
            ]
        );
        assert_eq!(cards[0].value, "25.0°C");
        assert_eq!(cards[0].sub.as_deref(), Some("Monday, 19 August 2024 02:00"));
        assert_eq!(cards[2].value, "25.0°C");
        assert_eq!(cards[3].value, "1.5°C");
    }

    #[test]
    fn cards_convert_to_fahrenheit() {
        let stats = compute(&readings()).unwrap();
        let cards = stat_cards(&stats, TemperatureUnit::Fahrenheit, "");

        assert_eq!(cards[0].value, "77.0°F");
        // Delta converts by scale only
        assert_eq!(cards[3].value, "2.7°F");
    }

    #[test]
    fn chart_series_pairs_labels_with_values() {
        let series = chart_series(&readings(), TemperatureUnit::Celsius);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].label, "Mon 00:00");
        assert_eq!(series[0].value, 24.0);
    }

    #[test]
    fn chart_series_converts_values() {
        let series = chart_series(&readings(), TemperatureUnit::Fahrenheit);
        assert_eq!(series[2].value, 77.0);
    }

    #[test]
    fn table_rows_render_full_labels() {
        let rows = table_rows(&readings(), TemperatureUnit::Celsius);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].time, "Monday, 19 August 2024 01:00");
        assert_eq!(rows[1].value, "23.5°C");
    }

    #[test]
    fn empty_readings_yield_empty_widgets() {
        assert!(chart_series(&[], TemperatureUnit::Celsius).is_empty());
        assert!(table_rows(&[], TemperatureUnit::Celsius).is_empty());
    }
}
