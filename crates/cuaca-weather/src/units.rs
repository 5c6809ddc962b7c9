//! Celsius/Fahrenheit conversion and display formatting.

use crate::types::TemperatureUnit;

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Render a Celsius value in the requested unit, one decimal place.
pub fn format_temperature(value_c: f64, unit: TemperatureUnit) -> String {
    let value = match unit {
        TemperatureUnit::Celsius => value_c,
        TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(value_c),
    };
    format!("{:.1}°{}", value, unit.letter())
}

/// Render a temperature difference. Differences convert by scale only,
/// with no freezing-point offset.
pub fn format_delta(delta_c: f64, unit: TemperatureUnit) -> String {
    let value = match unit {
        TemperatureUnit::Celsius => delta_c,
        TemperatureUnit::Fahrenheit => delta_c * 9.0 / 5.0,
    };
    format!("{:.1}°{}", value, unit.letter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freezing_point() {
        assert_eq!(format_temperature(0.0, TemperatureUnit::Celsius), "0.0°C");
        assert_eq!(format_temperature(0.0, TemperatureUnit::Fahrenheit), "32.0°F");
    }

    #[test]
    fn round_trip_is_lossless_within_tolerance() {
        for &c in &[-40.0, -17.78, 0.0, 24.5, 36.6, 100.0] {
            let back = fahrenheit_to_celsius(celsius_to_fahrenheit(c));
            assert!((back - c).abs() < 1e-9, "round trip drifted for {c}");
        }
    }

    #[test]
    fn minus_forty_is_shared() {
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn formats_one_decimal_place() {
        assert_eq!(format_temperature(23.456, TemperatureUnit::Celsius), "23.5°C");
        assert_eq!(format_temperature(25.0, TemperatureUnit::Fahrenheit), "77.0°F");
    }

    #[test]
    fn delta_converts_by_scale_only() {
        assert_eq!(format_delta(1.5, TemperatureUnit::Celsius), "1.5°C");
        // 1.5 °C of change is 2.7 °F of change, not 34.7
        assert_eq!(format_delta(1.5, TemperatureUnit::Fahrenheit), "2.7°F");
        assert_eq!(format_delta(-2.0, TemperatureUnit::Celsius), "-2.0°C");
    }
}
