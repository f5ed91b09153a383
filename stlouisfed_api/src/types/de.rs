//! Deserialization helpers for FRED's loosely typed JSON.

use chrono::{DateTime, FixedOffset};
use serde::{de, Deserialize, Deserializer};

/// Placeholder FRED sends for a missing observation value.
pub const EMPTY_VALUE: &str = ".";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%#z";

/// Parses a FRED timestamp such as `2013-07-31 09:26:16-05`.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(s, TIMESTAMP_FORMAT)
}

/// Parses an observation value, mapping [`EMPTY_VALUE`] and blanks to `None`.
pub fn parse_value(s: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let s = s.trim();
    if s.is_empty() || s == EMPTY_VALUE {
        return Ok(None);
    }
    s.parse::<f64>().map(Some)
}

pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(de::Error::custom)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

/// Accepts `"12.5"`, `12.5`, `"."` or `null`.
pub(crate) fn value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(n.as_f64()),
        Some(NumberOrString::String(s)) => parse_value(&s).map_err(de::Error::custom),
    }
}

/// Accepts either a JSON string or a number and keeps its text.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n.to_string()),
        NumberOrString::String(s) => Ok(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_with_hour_offset() {
        let ts = parse_timestamp("2013-07-31 09:26:16-05").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(ts.to_rfc3339(), "2013-07-31T09:26:16-05:00");
    }

    #[test]
    fn empty_value_is_none() {
        assert_eq!(parse_value(".").unwrap(), None);
        assert_eq!(parse_value("").unwrap(), None);
        assert_eq!(parse_value("3.25").unwrap(), Some(3.25));
        assert!(parse_value("n/a").is_err());
    }
}
