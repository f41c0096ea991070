//! Elapsed-time fields from the Unix `time` command.
//!
//! GNU `time` reports wall-clock duration as `[HH:]MM:SS[.fff]`. The
//! fractional part is decoded digit by digit so `0:01.23` is exactly
//! 1.23 seconds.

use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Maximum number of fractional digits kept (nanosecond resolution).
const MAX_FRACTION_DIGITS: usize = 9;

/// Parse an elapsed-time field (`[HH:]MM:SS[.fff]`) into a [`Duration`].
///
/// Two colon-separated fields are read as `MM:SS`, three as `HH:MM:SS`.
/// Any other field count is an error.
pub fn parse_elapsed(elapsed: &str) -> Result<Duration> {
    let fields: Vec<&str> = elapsed.trim().split(':').collect();
    let (hours, minutes, seconds) = match fields.as_slice() {
        [minutes, seconds] => ("0", *minutes, *seconds),
        [hours, minutes, seconds] => (*hours, *minutes, *seconds),
        _ => bail!(
            "elapsed time does not have 2 or 3 fields: {elapsed:?} ({} fields)",
            fields.len()
        ),
    };

    let hours = parse_whole(hours).with_context(|| format!("hours in {elapsed:?}"))?;
    let minutes = parse_whole(minutes).with_context(|| format!("minutes in {elapsed:?}"))?;
    let (secs, nanos) = parse_seconds(seconds).with_context(|| format!("seconds in {elapsed:?}"))?;

    let total = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(secs))
        .ok_or_else(|| anyhow::anyhow!("elapsed time overflows: {elapsed:?}"))?;

    Ok(Duration::new(total, nanos))
}

/// Format a duration the way `time` prints it, with millisecond precision.
///
/// Durations under an hour render as `M:SS.fff`, longer ones as `H:MM:SS.fff`.
pub fn format_elapsed(duration: Duration) -> String {
    let total_millis = duration.as_millis();
    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    let secs = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}.{millis:03}")
    } else {
        format!("{minutes}:{secs:02}.{millis:03}")
    }
}

fn parse_whole(field: &str) -> Result<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        bail!("not a non-negative integer: {field:?}");
    }
    field
        .parse()
        .with_context(|| format!("integer out of range: {field:?}"))
}

/// Split `SS[.fff]` into whole seconds and nanoseconds.
fn parse_seconds(field: &str) -> Result<(u64, u32)> {
    let (whole, fraction) = match field.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (field, ""),
    };
    let secs = parse_whole(whole)?;

    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        bail!("invalid fractional seconds: {field:?}");
    }
    let mut nanos: u32 = 0;
    for (i, digit) in fraction.bytes().take(MAX_FRACTION_DIGITS).enumerate() {
        let place = 10u32.pow((MAX_FRACTION_DIGITS - 1 - i) as u32);
        nanos += u32::from(digit - b'0') * place;
    }
    Ok((secs, nanos))
}

/// Serde adapter storing `Option<Duration>` as fractional seconds.
///
/// Use with `#[serde(with = "crate::elapsed::seconds")]`.
pub mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as an `f64` number of seconds, or `null`.
    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_f64(duration.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from an `f64` number of seconds, or `null`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let Some(secs) = Option::<f64>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom(format!("invalid duration in seconds: {secs}")));
        }
        // Round to the nearest nanosecond; `1.23 * 1e9` is not exact in binary.
        let nanos = (secs * 1e9).round() as u64;
        Ok(Some(Duration::from_nanos(nanos)))
    }
}
