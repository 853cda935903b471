//! Time-of-day and duration helpers
//!
//! Race timestamps are wall-clock times of day with millisecond precision
//! (`HH:MM:SS.mmm`). Durations between them are rendered the same way.

use chrono::{Duration, NaiveTime};

const TIME_FORMAT: &str = "%H:%M:%S%.3f";
const TIME_FORMAT_SECONDS: &str = "%H:%M:%S";

/// Parse a time of day in `HH:MM:SS.mmm` or `HH:MM:SS` form
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, TIME_FORMAT_SECONDS))
        .ok()
}

/// Format a time of day as `HH:MM:SS.mmm`
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Format a duration as `HH:MM:SS.mmm`; hours are not wrapped at 24
pub fn format_duration(duration: Duration) -> String {
    let sign = if duration < Duration::zero() { "-" } else { "" };
    let total_ms = duration.num_milliseconds().abs();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1_000) % 60;
    let millis = total_ms % 1_000;
    format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, seconds, millis)
}

/// Duration as fractional seconds
pub fn seconds_f64(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1_000.0
}

/// Add a duration to a time of day, returning `None` if the result crosses midnight
pub fn checked_add(time: NaiveTime, duration: Duration) -> Option<NaiveTime> {
    let (result, overflow) = time.overflowing_add_signed(duration);
    (overflow == 0).then_some(result)
}

/// Parse a start interval.
///
/// Accepts clock form (`00:01:30`, `00:00:30.500`, hours may exceed 23) and
/// unit form built from `h`, `m`, `s` and `ms` segments (`1m30s`, `90s`).
pub fn parse_interval(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.contains(':') {
        parse_clock_interval(value)
    } else {
        parse_unit_interval(value)
    }
}

fn parse_clock_interval(value: &str) -> Option<Duration> {
    let parts: Vec<&str> = value.split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return None;
    };
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if hours < 0 || !(0..60).contains(&minutes) {
        return None;
    }

    let (whole, millis) = match seconds.split_once('.') {
        Some((whole, frac)) => {
            if frac.is_empty() || frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            // right-pad so ".5" means 500ms
            let padded = format!("{:0<3}", frac);
            (whole, padded.parse::<i64>().ok()?)
        }
        None => (*seconds, 0),
    };
    let whole: i64 = whole.parse().ok()?;
    if !(0..60).contains(&whole) {
        return None;
    }

    let total_ms = ((hours * 60 + minutes) * 60 + whole) * 1_000 + millis;
    Some(Duration::milliseconds(total_ms))
}

fn parse_unit_interval(value: &str) -> Option<Duration> {
    let mut total_ms: i64 = 0;
    let mut rest = value;

    while !rest.is_empty() {
        let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let amount: i64 = rest[..digits].parse().ok()?;
        rest = &rest[digits..];

        let (factor, unit_len) = if rest.starts_with("ms") {
            (1, 2)
        } else if rest.starts_with('h') {
            (3_600_000, 1)
        } else if rest.starts_with('m') {
            (60_000, 1)
        } else if rest.starts_with('s') {
            (1_000, 1)
        } else {
            return None;
        };
        rest = &rest[unit_len..];
        total_ms = total_ms.checked_add(amount.checked_mul(factor)?)?;
    }

    Some(Duration::milliseconds(total_ms))
}
