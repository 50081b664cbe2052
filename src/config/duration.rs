//! Duration parsing utilities.

use super::ConfigError;
use std::time::Duration;

/// Parse a duration string like "1h", "5m", "30s", "250ms" or "300".
/// Supports:
/// - Plain numbers (interpreted as seconds): "300"
/// - Milliseconds suffix: "250ms"
/// - Seconds suffix: "300s"
/// - Minutes suffix: "30m"
/// - Hours suffix: "1h"
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ConfigError::InvalidDuration {
            input: s.to_string(),
            reason: "empty duration string".to_string(),
        });
    }

    // "ms" must be checked before "m" and "s"
    if let Some(num_str) = s.strip_suffix("ms") {
        return Ok(Duration::from_millis(parse_number(s, num_str, "milliseconds")?));
    }
    if let Some(num_str) = s.strip_suffix('h') {
        let hours = parse_number(s, num_str, "hours")?;
        return Ok(Duration::from_secs(hours.saturating_mul(3600)));
    }
    if let Some(num_str) = s.strip_suffix('m') {
        let minutes = parse_number(s, num_str, "minutes")?;
        return Ok(Duration::from_secs(minutes.saturating_mul(60)));
    }
    if let Some(num_str) = s.strip_suffix('s') {
        return Ok(Duration::from_secs(parse_number(s, num_str, "seconds")?));
    }

    // No suffix - treat as seconds
    Ok(Duration::from_secs(parse_number(s, s, "duration")?))
}

fn parse_number(input: &str, num_str: &str, unit: &str) -> Result<u64, ConfigError> {
    num_str
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidDuration {
            input: input.to_string(),
            reason: format!("invalid {unit} value '{num_str}'"),
        })
}

/// Serde adapter for `Duration` fields written as duration strings.
pub(crate) mod serde_duration {
    use super::parse_duration;
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl Visitor<'_> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a duration such as 300, \"30s\", \"5m\", \"1h\" or \"250ms\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
                Ok(Duration::from_secs(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
                u64::try_from(v)
                    .map(Duration::from_secs)
                    .map_err(|_| E::custom(format!("negative duration {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
                parse_duration(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}
