//! Scan interval parsing: `"15m"`, `"1h"`, `"90s"`, `"1d"`, or a bare
//! number of minutes.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{de, Deserialize, Deserializer, Serializer};

const UNITS: [(char, u64); 4] = [('d', 24 * 60 * 60), ('h', 60 * 60), ('m', 60), ('s', 1)];

/// Parse an interval such as `"15m"`.
///
/// Units are `d`, `h`, `m` and `s`; case and surrounding whitespace are
/// ignored. Zero is rejected: a scan interval has to advance.
///
/// ```
/// use refundbook::duration::parse_interval;
/// use std::time::Duration;
///
/// assert_eq!(parse_interval("15m").unwrap(), Duration::from_secs(15 * 60));
/// assert_eq!(parse_interval(" 2H ").unwrap(), Duration::from_secs(2 * 60 * 60));
/// ```
pub fn parse_interval(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    let unit = s.chars().last().context("interval is empty")?;
    let (_, secs_per_unit) = UNITS
        .iter()
        .find(|(suffix, _)| *suffix == unit)
        .with_context(|| format!("interval {s:?} must end with d, h, m, or s"))?;

    let count: u64 = s[..s.len() - unit.len_utf8()]
        .trim()
        .parse()
        .with_context(|| format!("invalid number in interval {s:?}"))?;

    let secs = count
        .checked_mul(*secs_per_unit)
        .with_context(|| format!("interval {s:?} is too large"))?;
    if secs == 0 {
        anyhow::bail!("interval must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

/// Render with the largest unit that divides the interval exactly.
pub fn format_interval(d: Duration) -> String {
    let secs = d.as_secs();
    UNITS
        .iter()
        .find(|(_, size)| secs >= *size && secs % size == 0)
        .map(|(suffix, size)| format!("{}{}", secs / size, suffix))
        .unwrap_or_else(|| format!("{secs}s"))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntervalRepr {
    Minutes(u64),
    Text(String),
}

/// Accepts `"15m"`-style strings or a plain integer of minutes.
///
/// Use with `#[serde(deserialize_with = "deserialize_interval")]`.
pub fn deserialize_interval<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match IntervalRepr::deserialize(deserializer)? {
        IntervalRepr::Minutes(0) => Err(de::Error::custom("interval must be greater than zero")),
        IntervalRepr::Minutes(minutes) => minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| de::Error::custom("interval is too large")),
        IntervalRepr::Text(text) => parse_interval(&text).map_err(de::Error::custom),
    }
}

pub fn serialize_interval<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_interval(*d))
}
