//! Delay durations for deferred actions
//!
//! ```yaml
//! delay: 30m        # minutes
//! delay: 1h30m      # combined units
//! delay: 2d         # days
//! delay: 90         # bare number = seconds
//! ```

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("Invalid duration format: {0}")]
    InvalidFormat(String),
}

/// Parse a duration string like "1h30m", "45s", "250ms" or "2d"
pub fn parse_duration(s: &str) -> Result<Duration, DurationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DurationError::InvalidFormat("empty string".to_string()));
    }

    let mut total = Duration::ZERO;
    let mut chars = s.chars().peekable();

    while chars.peek().is_some() {
        let mut number = String::new();
        while let Some(c) = chars.peek().copied().filter(|c| c.is_ascii_digit() || *c == '.') {
            number.push(c);
            chars.next();
        }

        let mut unit = String::new();
        while let Some(c) = chars.peek().copied().filter(|c| c.is_ascii_alphabetic()) {
            unit.push(c);
            chars.next();
        }

        if number.is_empty() {
            return Err(DurationError::InvalidFormat(format!(
                "expected number in '{}'",
                s
            )));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| DurationError::InvalidFormat(format!("invalid number: {}", number)))?;

        let secs = match unit.as_str() {
            "" | "s" => value,
            "ms" => value / 1000.0,
            "m" => value * 60.0,
            "h" => value * 60.0 * 60.0,
            "d" => value * 24.0 * 60.0 * 60.0,
            other => {
                return Err(DurationError::InvalidFormat(format!(
                    "unknown unit '{}'",
                    other
                )))
            }
        };
        total = Duration::try_from_secs_f64(secs)
            .ok()
            .and_then(|part| total.checked_add(part))
            .ok_or_else(|| DurationError::InvalidFormat(format!("duration too large: {}", s)))?;
    }

    Ok(total)
}

/// Serde adapter for `Option<Duration>` accepting a duration string or seconds
pub mod optional {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDelay {
        Seconds(u64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawDelay>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawDelay::Seconds(secs)) => Ok(Some(Duration::from_secs(secs))),
            Some(RawDelay::Text(text)) => parse_duration(&text)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_str(&format!("{}ms", duration.as_millis())),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("500s").unwrap(), Duration::from_secs(500));
        assert_eq!(parse_duration("1d").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("90").unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("5w").is_err());
    }

    #[test]
    fn test_parse_duration_overflow_is_error() {
        let err = parse_duration("99999999999999999999d").unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert!(parse_duration("18446744073709551615s18446744073709551615s").is_err());
    }
}
