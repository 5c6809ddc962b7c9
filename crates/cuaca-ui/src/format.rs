//! Display label formatting for chart ticks and table rows.

use chrono::NaiveDateTime;

/// Short chart-axis label: `Mon 14:00`
pub fn hour_label(time: NaiveDateTime) -> String {
    time.format("%a %H:%M").to_string()
}

/// Full table/card label: `Monday, 19 August 2024 14:00`
pub fn long_label(time: NaiveDateTime) -> String {
    time.format("%A, %d %B %Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    #[test]
    fn hour_label_is_weekday_and_time() {
        assert_eq!(hour_label(t("2024-08-19T14:00")), "Mon 14:00");
    }

    #[test]
    fn long_label_spells_out_the_date() {
        assert_eq!(long_label(t("2024-08-19T02:00")), "Monday, 19 August 2024 02:00");
    }
}
