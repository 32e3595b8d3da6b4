use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    #[error("Invalid datetime format: {0}. Expected: YYYY-MM-DD HH:MM:SS")]
    InvalidDatetime(String),

    #[error("Invalid time units: {0}. Expected: <unit> since <reference>")]
    InvalidUnits(String),

    #[error("Unsupported time unit: {0}")]
    UnsupportedUnit(String),

    #[error("Time value {0} is out of range")]
    OutOfRange(f64),
}

/// Naive formats accepted for datetimes, all interpreted as UTC.
const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y%m%dT%H%MZ",
    "%Y-%m-%d %H:%M",
];

/// Parse a datetime string into UTC.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS[Z]`, RFC 3339 with an
/// offset, the compact `YYYYMMDDTHHMMZ` form used in forecast file names,
/// and a bare `YYYY-MM-DD` (midnight).
pub fn parse_datetime(datetime_str: &str) -> Result<DateTime<Utc>, TimeError> {
    let trimmed = datetime_str.trim();

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    Err(TimeError::InvalidDatetime(datetime_str.to_string()))
}

/// Seconds per unit for the CF time units we understand
fn unit_seconds(unit: &str) -> Result<f64, TimeError> {
    match unit.to_ascii_lowercase().as_str() {
        "second" | "seconds" | "sec" | "secs" | "s" => Ok(1.0),
        "minute" | "minutes" | "min" | "mins" => Ok(60.0),
        "hour" | "hours" | "hr" | "hrs" | "h" => Ok(3600.0),
        "day" | "days" | "d" => Ok(86400.0),
        other => Err(TimeError::UnsupportedUnit(other.to_string())),
    }
}

/// Split a CF units string such as `hours since 1970-01-01 00:00:00` into
/// the seconds-per-unit factor and the reference epoch.
pub fn parse_cf_units(units: &str) -> Result<(f64, DateTime<Utc>), TimeError> {
    let (unit, reference) = units
        .split_once(" since ")
        .ok_or_else(|| TimeError::InvalidUnits(units.to_string()))?;

    let factor = unit_seconds(unit.trim())?;
    // Some writers append an explicit UTC marker after the reference time
    let reference = reference
        .trim()
        .trim_end_matches(" UTC")
        .trim_end_matches(" utc");
    let epoch = parse_datetime(reference).map_err(|_| TimeError::InvalidUnits(units.to_string()))?;

    Ok((factor, epoch))
}

/// Decode raw time coordinate points using their CF `units` attribute.
///
/// Values are rounded to the nearest millisecond.
pub fn decode_cf_times(values: &[f64], units: &str) -> Result<Vec<DateTime<Utc>>, TimeError> {
    let (factor, epoch) = parse_cf_units(units)?;

    values
        .iter()
        .map(|&value| {
            millis_offset(value * factor * 1000.0)
                .and_then(|offset| epoch.checked_add_signed(offset))
                .ok_or(TimeError::OutOfRange(value))
        })
        .collect()
}

/// Round a millisecond offset to a `Duration`, or `None` when it does not fit
fn millis_offset(millis: f64) -> Option<Duration> {
    let millis = millis.round();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

/// Format a datetime the way time filters and log messages present it
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}
