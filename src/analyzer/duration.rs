//! Conversions between decimal hours, timestamp pairs and display strings.
//!
//! Three output shapes live here and are deliberately not interchangeable:
//! `format_flight_duration` drops empty fields (`"2h"`, `"15m"`),
//! `calculate_duration` always emits both fields (`"0h 0m"`), and
//! `duty_clock_duration` emits decimal hours (`"8.5"`).
//!
//! None of these functions fail. Malformed input degrades to a placeholder.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::{Decimal, RoundingStrategy};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parses a decimal-hour string such as `"2.3"`. Unparseable input yields NaN.
///
/// Only plain numeric literals are read, so `"inf"` and `"nan"` are rejected.
pub fn parse_hours(raw: &str) -> f64 {
    let raw = raw.trim();
    let numeric = raw.bytes().any(|byte| byte.is_ascii_digit())
        && raw
            .bytes()
            .all(|byte| byte.is_ascii_digit() || matches!(byte, b'.' | b'+' | b'-' | b'e' | b'E'));

    if !numeric {
        return f64::NAN;
    }

    raw.parse::<f64>().unwrap_or(f64::NAN)
}

/// `"2.5"` -> `"2h 30m"`, `"3"` -> `"3h"`, `"0.25"` -> `"15m"`, `"0"` -> `"0m"`.
pub fn format_flight_duration(duration: &str) -> String {
    let hours = parse_hours(duration);
    let whole_hours = hours.floor();
    let minutes = ((hours - whole_hours) * 60.0).round();

    if whole_hours == 0.0 {
        format!("{minutes}m")
    } else if minutes == 0.0 {
        format!("{whole_hours}h")
    } else {
        format!("{whole_hours}h {minutes}m")
    }
}

/// Elapsed time between two timestamps as `"{h}h {m}m"`.
///
/// A missing endpoint or an end before the start both clamp to `"0h 0m"`.
pub fn calculate_duration(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return "0h 0m".to_string();
    };

    if end < start {
        return "0h 0m".to_string();
    }

    let minutes = (end - start).num_minutes();
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Duty span between two `"HH:MM"` wall-clock times, in decimal hours.
///
/// An end earlier than the start is taken to be on the following day. Only
/// one midnight crossing is representable.
pub fn duty_clock_duration(start: &str, end: &str) -> String {
    let (Some(start_minutes), Some(end_minutes)) = (parse_clock(start), parse_clock(end)) else {
        return format_decimal_hours(f64::NAN);
    };

    let mut minutes = end_minutes - start_minutes;
    if minutes < 0 {
        minutes += MINUTES_PER_DAY;
    }

    format_decimal_hours(minutes as f64 / 60.0)
}

/// One decimal place, ties rounded away from zero (`4.25` -> `"4.3"`).
///
/// Rounds the exact stored value, so `0.15` (stored slightly below) gives `"0.1"`.
pub fn format_decimal_hours(hours: f64) -> String {
    if !hours.is_finite() {
        return format!("{hours}");
    }

    match Decimal::from_f64_retain(hours) {
        Some(exact) => {
            let rounded = exact.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.1}")
        }
        None => format!("{hours:.1}"),
    }
}

pub fn elapsed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    if end < start {
        return 0.0;
    }

    (end - start).num_seconds() as f64 / 3600.0
}

fn parse_clock(raw: &str) -> Option<i64> {
    let (hours, minutes) = raw.trim().split_once(':')?;
    let hours = hours.trim().parse::<i64>().ok()?;
    let minutes = minutes.trim().parse::<i64>().ok()?;

    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::{
        calculate_duration, duty_clock_duration, elapsed_hours, format_decimal_hours,
        format_flight_duration, parse_hours,
    };
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn flight_duration_drops_empty_fields() {
        assert_eq!(format_flight_duration("0"), "0m");
        assert_eq!(format_flight_duration("2.5"), "2h 30m");
        assert_eq!(format_flight_duration("3"), "3h");
        assert_eq!(format_flight_duration("0.25"), "15m");
        assert_eq!(format_flight_duration("1.3"), "1h 18m");
    }

    #[test]
    fn flight_duration_propagates_nan() {
        assert_eq!(format_flight_duration("abc"), "NaNh NaNm");
        assert_eq!(format_flight_duration(""), "NaNh NaNm");
        assert!(parse_hours("two").is_nan());
    }

    #[test]
    fn non_numeric_float_spellings_are_not_hours() {
        for raw in ["inf", "-inf", "infinity", "NaN", "nan", "e", "."] {
            assert!(parse_hours(raw).is_nan(), "{raw} should not parse");
        }
        assert_eq!(format_flight_duration("inf"), "NaNh NaNm");
        assert_eq!(parse_hours(" 1.5 "), 1.5);
        assert_eq!(parse_hours("1e1"), 10.0);
        assert!(parse_hours("1.5h").is_nan());
    }

    #[test]
    fn timestamp_duration_clamps_missing_and_reversed() {
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();

        assert_eq!(calculate_duration(None, Some(start)), "0h 0m");
        assert_eq!(calculate_duration(Some(start), None), "0h 0m");
        assert_eq!(
            calculate_duration(Some(start), Some(start - Duration::minutes(5))),
            "0h 0m"
        );
    }

    #[test]
    fn timestamp_duration_always_has_two_fields() {
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();

        assert_eq!(
            calculate_duration(Some(start), Some(start + Duration::minutes(135))),
            "2h 15m"
        );
        assert_eq!(
            calculate_duration(Some(start), Some(start + Duration::hours(3))),
            "3h 0m"
        );
        assert_eq!(
            calculate_duration(Some(start), Some(start + Duration::seconds(59))),
            "0h 0m"
        );
    }

    #[test]
    fn duty_clock_wraps_past_midnight_once() {
        assert_eq!(duty_clock_duration("08:00", "12:30"), "4.5");
        assert_eq!(duty_clock_duration("22:00", "02:00"), "4.0");
        assert_eq!(duty_clock_duration("06:15", "06:15"), "0.0");
    }

    #[test]
    fn duty_clock_rejects_garbage_without_panicking() {
        assert_eq!(duty_clock_duration("8am", "12:30"), "NaN");
        assert_eq!(duty_clock_duration("08:00", ""), "NaN");
    }

    #[test]
    fn decimal_hours_round_half_away_from_zero() {
        assert_eq!(format_decimal_hours(4.25), "4.3");
        assert_eq!(format_decimal_hours(0.0), "0.0");
        assert_eq!(format_decimal_hours(8.5), "8.5");
        assert_eq!(format_decimal_hours(f64::NAN), "NaN");
    }

    #[test]
    fn decimal_hours_round_the_exact_binary_value() {
        assert_eq!(format_decimal_hours(1.45), "1.4");
        assert_eq!(format_decimal_hours(0.15), "0.1");
        assert_eq!(format_decimal_hours(8.45), "8.4");
        assert_eq!(format_decimal_hours(0.7 + 0.75), "1.4");
        assert_eq!(format_decimal_hours(0.35), "0.3");
        assert_eq!(format_decimal_hours(2.675), "2.7");
        assert_eq!(duty_clock_duration("08:00", "08:09"), "0.1");
    }

    #[test]
    fn elapsed_hours_never_negative() {
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(elapsed_hours(start, start + Duration::minutes(90)), 1.5);
        assert_eq!(elapsed_hours(start, start - Duration::minutes(90)), 0.0);
    }
}
