use time::macros::format_description;
use time::{Date, Time};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_TIME: &str = "Enter a valid time.";
pub const INVALID_DATE: &str = "Enter a valid date.";

pub fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map(str::trim).unwrap_or("").is_empty()
}

/// Accepts wall-clock times the frontend submits, e.g. "09:30"
pub fn is_valid_clock_time(value: &str) -> bool {
    let format = format_description!("[hour]:[minute]");
    Time::parse(value, &format).is_ok()
}

/// Accepts calendar dates the frontend submits, e.g. "2026-08-07"
pub fn is_valid_calendar_date(value: &str) -> bool {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_covers_missing_empty_and_whitespace() {
        assert!(is_blank(&None));
        assert!(is_blank(&Some(String::new())));
        assert!(is_blank(&Some("   ".to_string())));
        assert!(!is_blank(&Some("A1".to_string())));
    }

    #[test]
    fn clock_times_parse_hh_mm_only() {
        assert!(is_valid_clock_time("09:30"));
        assert!(is_valid_clock_time("23:59"));
        assert!(!is_valid_clock_time("24:00"));
        assert!(!is_valid_clock_time("9am"));
        assert!(!is_valid_clock_time(""));
    }

    #[test]
    fn calendar_dates_parse_iso_style() {
        assert!(is_valid_calendar_date("2026-08-07"));
        assert!(!is_valid_calendar_date("2026-13-01"));
        assert!(!is_valid_calendar_date("07/08/2026"));
    }
}
