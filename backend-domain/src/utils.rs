use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};

pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|err| anyhow!(err))
}

/// Parses "H:MM" / "HH:MM" wall-clock times. Anything after the minutes is ignored.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime> {
    let mut parts = value.trim().split(':');
    let hours = parts
        .next()
        .filter(|part| !part.is_empty())
        .ok_or_else(|| anyhow!("missing hours in '{}'", value))?
        .trim()
        .parse::<u32>()
        .map_err(|err| anyhow!("invalid hours in '{}': {}", value, err))?;
    let minutes = parts
        .next()
        .ok_or_else(|| anyhow!("missing minutes in '{}'", value))?
        .trim()
        .parse::<u32>()
        .map_err(|err| anyhow!("invalid minutes in '{}': {}", value, err))?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
        .ok_or_else(|| anyhow!("time out of range: '{}'", value))
}

/// Canonical "HH:MM" form, so stored times sort in clock order.
pub fn canonical_clock_time(value: &str) -> Result<String> {
    Ok(parse_clock_time(value)?.format("%H:%M").to_string())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
