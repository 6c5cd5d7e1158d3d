//! Endpoint parameter validation
//!
//! Shape-only checks run before any URL is built. Dates and times are
//! matched against digit patterns, not calendars: `9999-99-99` and `25:99`
//! pass. The server rejects implausible values itself.

use crate::error::{Error, Result};

/// Periods accepted by the heart-rate time-series endpoint.
pub const PERIODS: &[&str] = &["1d", "7d", "30d", "1w", "1m"];

/// Intraday detail levels accepted by the heart-rate endpoint.
pub const DETAIL_LEVELS: &[&str] = &["1sec", "1min", "5min", "15min"];

/// `today` or `YYYY-MM-DD`.
pub fn date(value: &str) -> Result<&str> {
    if value == "today" || matches_shape(value, "dddd-dd-dd") {
        Ok(value)
    } else {
        Err(Error::Validation(format!(
            "date must be 'today' or yyyy-MM-dd, got '{value}'"
        )))
    }
}

/// `HH:mm`.
pub fn time(value: &str) -> Result<&str> {
    if matches_shape(value, "dd:dd") {
        Ok(value)
    } else {
        Err(Error::Validation(format!(
            "time must be HH:mm, got '{value}'"
        )))
    }
}

/// Membership in a fixed set.
pub fn one_of<'a>(name: &str, value: &'a str, allowed: &[&str]) -> Result<&'a str> {
    if allowed.contains(&value) {
        Ok(value)
    } else {
        Err(Error::Validation(format!(
            "{name} must be one of {}, got '{value}'",
            allowed.join(", ")
        )))
    }
}

pub fn period(value: &str) -> Result<&str> {
    one_of("period", value, PERIODS)
}

pub fn detail_level(value: &str) -> Result<&str> {
    one_of("detail level", value, DETAIL_LEVELS)
}

/// Optional intraday time window: both ends or neither.
pub fn time_window<'a>(
    start: Option<&'a str>,
    end: Option<&'a str>,
) -> Result<Option<(&'a str, &'a str)>> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => Ok(Some((time(start)?, time(end)?))),
        _ => Err(Error::Validation(
            "start_time and end_time must be supplied together".into(),
        )),
    }
}

/// `d` in `shape` matches an ASCII digit, anything else matches itself.
fn matches_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(v, s)| match s {
            b'd' => v.is_ascii_digit(),
            literal => v == literal,
        })
}
