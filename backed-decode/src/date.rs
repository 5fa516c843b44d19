//! Date decoding strategies

use crate::document::Document;
use crate::located::Located;
use backed_path::{BackedError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type CustomDate = dyn Fn(&Value) -> Result<DateTime<Utc>> + Send + Sync;

/// How a located value is turned into a point in time
#[derive(Clone, Default)]
pub enum DateStrategy {
    /// Use the value's own `Deserialize` implementation (RFC 3339 strings)
    #[default]
    Deferred,
    /// Numeric seconds since the Unix epoch
    SecondsSince1970,
    /// Numeric milliseconds since the Unix epoch
    MillisecondsSince1970,
    /// ISO 8601 / RFC 3339 string
    Iso8601,
    /// String parsed with a chrono format (`%Y-%m-%d %H:%M:%S`, ...)
    ///
    /// Tried as a zoned timestamp, then a naive timestamp (UTC), then a
    /// date (midnight UTC).
    Formatted(String),
    /// Arbitrary function over the located value
    Custom(Arc<CustomDate>),
}

impl DateStrategy {
    /// Strategy from a chrono format string
    pub fn formatted(format: impl Into<String>) -> Self {
        DateStrategy::Formatted(format.into())
    }

    /// Strategy from a function over the located JSON value
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<DateTime<Utc>> + Send + Sync + 'static,
    {
        DateStrategy::Custom(Arc::new(f))
    }

    /// Decode the located value
    pub fn decode<D: Document>(&self, located: &Located<'_, D>) -> Result<DateTime<Utc>> {
        match self {
            DateStrategy::Deferred => located.decode(),
            DateStrategy::SecondsSince1970 => from_seconds(located.decode::<f64>()?),
            DateStrategy::MillisecondsSince1970 => {
                from_seconds(located.decode::<f64>()? / 1000.0)
            }
            DateStrategy::Iso8601 => {
                let text: String = located.decode()?;
                DateTime::parse_from_rfc3339(&text)
                    .map(|date| date.with_timezone(&Utc))
                    .map_err(|e| {
                        BackedError::missing_value(format!(
                            "\"{}\" is not an ISO 8601 date: {}",
                            text, e
                        ))
                    })
            }
            DateStrategy::Formatted(format) => parse_formatted(&located.decode::<String>()?, format),
            DateStrategy::Custom(f) => f(&located.to_json()?),
        }
    }
}

impl fmt::Debug for DateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateStrategy::Deferred => f.write_str("Deferred"),
            DateStrategy::SecondsSince1970 => f.write_str("SecondsSince1970"),
            DateStrategy::MillisecondsSince1970 => f.write_str("MillisecondsSince1970"),
            DateStrategy::Iso8601 => f.write_str("Iso8601"),
            DateStrategy::Formatted(format) => f.debug_tuple("Formatted").field(format).finish(),
            DateStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Convert fractional epoch seconds to a UTC timestamp
pub fn from_seconds(seconds: f64) -> Result<DateTime<Utc>> {
    if !seconds.is_finite() {
        return Err(BackedError::missing_value(format!(
            "{} is not a valid timestamp",
            seconds
        )));
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return Err(BackedError::missing_value(format!(
            "timestamp {} is out of range",
            seconds
        )));
    }
    DateTime::from_timestamp(whole as i64, nanos).ok_or_else(|| {
        BackedError::missing_value(format!("timestamp {} is out of range", seconds))
    })
}

fn parse_formatted(text: &str, format: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_str(text, format) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
        return Ok(naive.and_utc());
    }
    if let Some(naive) = NaiveDate::parse_from_str(text, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }
    Err(BackedError::missing_value(format!(
        "\"{}\" does not match date format \"{}\"",
        text, format
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn decode(strategy: &DateStrategy, value: Value) -> Result<DateTime<Utc>> {
        strategy.decode(&Located::Node(&value))
    }

    #[test]
    fn seconds_and_milliseconds_agree() {
        let seconds = decode(&DateStrategy::SecondsSince1970, json!(1613984296)).unwrap();
        let millis = decode(&DateStrategy::MillisecondsSince1970, json!(1613984296000_i64)).unwrap();
        assert_eq!(seconds, millis);
        assert_eq!(seconds, Utc.timestamp_opt(1613984296, 0).unwrap());
    }

    #[test]
    fn fractional_and_negative_seconds() {
        let date = decode(&DateStrategy::SecondsSince1970, json!(1.5)).unwrap();
        assert_eq!(date.timestamp(), 1);
        assert_eq!(date.timestamp_subsec_millis(), 500);

        let date = decode(&DateStrategy::SecondsSince1970, json!(-468691200)).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(1955, 2, 24, 8, 0, 0).unwrap());
    }

    #[test]
    fn non_numeric_seconds_fail() {
        assert!(decode(&DateStrategy::SecondsSince1970, json!("N/A")).is_err());
        assert!(from_seconds(f64::NAN).is_err());
        assert!(matches!(
            from_seconds(1e300),
            Err(BackedError::MissingValue { .. })
        ));
    }

    #[test]
    fn iso8601_strings() {
        let date = decode(&DateStrategy::Iso8601, json!("2021-02-22T08:58:16Z")).unwrap();
        assert_eq!(date.timestamp(), 1613984296);

        let date = decode(&DateStrategy::Iso8601, json!("2021-02-22T09:58:16+01:00")).unwrap();
        assert_eq!(date.timestamp(), 1613984296);

        assert!(matches!(
            decode(&DateStrategy::Iso8601, json!("yesterday")),
            Err(BackedError::MissingValue { .. })
        ));
    }

    #[test]
    fn deferred_uses_rfc3339_deserialize() {
        let date = decode(&DateStrategy::Deferred, json!("2021-02-22T08:58:16Z")).unwrap();
        assert_eq!(date.timestamp(), 1613984296);
        assert!(decode(&DateStrategy::Deferred, json!(1613984296)).is_err());
    }

    #[test]
    fn formatted_strings() {
        let strategy = DateStrategy::formatted("%Y-%m-%d %H:%M:%S");
        let date = decode(&strategy, json!("2021-02-22 08:58:16")).unwrap();
        assert_eq!(date.timestamp(), 1613984296);

        let strategy = DateStrategy::formatted("%d/%m/%Y");
        let date = decode(&strategy, json!("22/02/2021")).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2021, 2, 22, 0, 0, 0).unwrap());

        let strategy = DateStrategy::formatted("%Y-%m-%d %H:%M:%S %z");
        let date = decode(&strategy, json!("2021-02-22 09:58:16 +0100")).unwrap();
        assert_eq!(date.timestamp(), 1613984296);

        assert!(matches!(
            decode(&strategy, json!("22/02/2021")),
            Err(BackedError::MissingValue { .. })
        ));
    }

    #[test]
    fn custom_strategy_sees_json() {
        let strategy = DateStrategy::custom(|value| match value {
            Value::String(s) if s == "epoch" => Ok(Utc.timestamp_opt(0, 0).unwrap()),
            _ => Err(BackedError::custom("not the epoch")),
        });
        assert_eq!(decode(&strategy, json!("epoch")).unwrap().timestamp(), 0);
        assert!(decode(&strategy, json!(0)).is_err());
    }
}
