//! Validation of user-supplied CLI values.
//!
//! Durations use the compact `1h30m`, `90s`, `500ms` notation that the
//! progress output prints, so a value copied from the output can be passed
//! straight back to `--timeout`.

use anyhow::{bail, Result};
use std::time::Duration;

const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("us", 1e3),
    ("µs", 1e3),
    ("ms", 1e6),
    ("s", 1e9),
    ("m", 60e9),
    ("h", 3600e9),
];

/// Parses a duration such as `90s`, `30m`, `1h30m` or `1.5h`.
///
/// A bare `0` is accepted. Every other number needs a unit.
///
/// # Examples
///
/// ```
/// use actions_wait::validation::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// assert!(parse_duration("-5s").is_err());
/// assert!(parse_duration("10").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration> {
    let s = input.trim();
    if s.is_empty() {
        bail!("Duration cannot be empty");
    }
    if s.starts_with('-') {
        bail!("Duration '{input}' must not be negative");
    }
    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos = 0f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, after) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            bail!("Invalid duration '{input}': expected a number");
        }
        let value: f64 = number
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration '{input}': bad number '{number}'"))?;

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, remainder) = after.split_at(unit_len);
        if unit.is_empty() {
            bail!("Invalid duration '{input}': missing unit (use ns, us, ms, s, m or h)");
        }
        let Some((_, scale)) = UNITS.iter().find(|(name, _)| *name == unit) else {
            bail!("Invalid duration '{input}': unknown unit '{unit}'");
        };

        total_nanos += value * scale;
        rest = remainder;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        bail!("Duration '{input}' is too large");
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

/// Parses the number of log lines to show for a failed job.
pub fn parse_line_count(input: &str) -> Result<usize> {
    let count: usize = input
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid line count '{input}': expected a whole number"))?;
    if count == 0 {
        bail!("Line count must be at least 1");
    }
    Ok(count)
}

/// Clap value parser for `--timeout`.
pub fn clap_duration_parser(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

/// Clap value parser for `--failed-output-lines`.
pub fn clap_line_count_parser(s: &str) -> Result<usize, String> {
    parse_line_count(s).map_err(|e| e.to_string())
}
