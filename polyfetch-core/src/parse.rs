//! Parse-with-fallback helpers
//!
//! Upstream payloads are loosely typed: JSON arrays smuggled inside strings,
//! dates in whatever format the record was created with, decimals that may
//! be empty. Every helper here returns a [`Parsed`] value that always carries
//! a usable result, plus a flag saying whether it had to fall back to a zero
//! value. Callers decide what to do with the flag (usually: log and move on).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

/// A parsed value together with whether it was degraded to a fallback
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> Parsed<T> {
    /// A value that parsed successfully (or was legitimately absent)
    pub fn clean(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    /// A fallback value standing in for input that could not be parsed
    pub fn degraded(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Split into `(value, was_degraded)`
    pub fn into_pair(self) -> (T, bool) {
        (self.value, self.degraded)
    }

    /// Emit a degradation event (if any) and return the value
    ///
    /// Degradations are logged at `warn` with `degraded = true` so they can be
    /// told apart from hard upstream errors in log pipelines.
    pub fn log_degraded(self, field: &str, record_id: &str) -> T {
        if self.degraded {
            log_degradation(field, record_id);
        }
        self.value
    }
}

/// Record that `field` of `record_id` was replaced by a fallback value
pub fn log_degradation(field: &str, record_id: &str) {
    warn!(degraded = true, field, record_id, "Field could not be parsed, using fallback");
}

/// Parse a JSON array that was serialized into a string, e.g. `"[\"Yes\", \"No\"]"`
///
/// Elements may be strings or numbers (numbers are rendered back to their
/// JSON text). A missing or blank input is an empty array, not a degradation.
pub fn parse_json_string_array(raw: Option<&str>) -> Parsed<Vec<String>> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Parsed::clean(Vec::new()),
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(_) => return Parsed::degraded(Vec::new()),
    };

    let strings: Option<Vec<String>> = values
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();

    match strings {
        Some(strings) => Parsed::clean(strings),
        None => Parsed::degraded(Vec::new()),
    }
}

/// Parse an upstream date string, trying each supported format in order
///
/// 1. RFC 3339 timestamp with timezone (`2025-03-01T12:00:00Z`)
/// 2. Date only (`2025-03-01`), taken as midnight UTC
/// 3. Date and time without timezone (`2025-03-01T12:00:00`, optional
///    fractional seconds, `T` or space separator), taken as UTC
///
/// A missing or blank input is `None` without degradation; a non-blank input
/// matching no format is `None` with degradation.
pub fn parse_end_date(raw: Option<&str>) -> Parsed<Option<DateTime<Utc>>> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Parsed::clean(None),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Parsed::clean(Some(dt.with_timezone(&Utc)));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Parsed::clean(Some(ndt.and_utc()));
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, format) {
            return Parsed::clean(Some(ndt.and_utc()));
        }
    }

    Parsed::degraded(None)
}

/// Parse a decimal string such as a price (`"0.65"`) or volume
///
/// Scientific notation (`"1e-4"`) is accepted. Anything else degrades to zero.
pub fn parse_decimal(raw: &str) -> Parsed<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map(Parsed::clean)
        .unwrap_or_else(|_| Parsed::degraded(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_string_array_parsing() {
        let parsed = parse_json_string_array(Some(r#"["Yes", "No"]"#));
        assert_eq!(parsed, Parsed::clean(vec!["Yes".to_string(), "No".to_string()]));
    }

    #[test]
    fn test_number_array_rendered_as_strings() {
        let parsed = parse_json_string_array(Some("[0.65, 0.35]"));
        assert!(!parsed.is_degraded());
        assert_eq!(parsed.value, vec!["0.65", "0.35"]);
    }

    #[test]
    fn test_unparseable_array_degrades_to_empty() {
        let parsed = parse_json_string_array(Some("Yes, No"));
        assert!(parsed.is_degraded());
        assert!(parsed.value.is_empty());

        let nested = parse_json_string_array(Some(r#"[{"name": "Yes"}]"#));
        assert!(nested.is_degraded());
        assert!(nested.value.is_empty());
    }

    #[test]
    fn test_missing_array_is_not_degraded() {
        assert_eq!(parse_json_string_array(None), Parsed::clean(Vec::new()));
        assert_eq!(parse_json_string_array(Some("  ")), Parsed::clean(Vec::new()));
    }

    #[test]
    fn test_end_date_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();

        assert_eq!(parse_end_date(Some("2025-03-01T12:30:00Z")).value, Some(expected));
        assert_eq!(
            parse_end_date(Some("2025-03-01T14:30:00+02:00")).value,
            Some(expected)
        );
        assert_eq!(parse_end_date(Some("2025-03-01T12:30:00")).value, Some(expected));
        assert_eq!(parse_end_date(Some("2025-03-01 12:30:00")).value, Some(expected));
        assert_eq!(
            parse_end_date(Some("2025-03-01")).value,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unknown_end_date_degrades_to_none() {
        let parsed = parse_end_date(Some("March 1st, 2025"));
        assert!(parsed.is_degraded());
        assert_eq!(parsed.value, None);

        assert_eq!(parse_end_date(None), Parsed::clean(None));
    }

    #[test]
    fn test_decimal_parsing() {
        assert_eq!(parse_decimal("0.65"), Parsed::clean(dec!(0.65)));
        assert_eq!(parse_decimal(" 1 "), Parsed::clean(dec!(1)));
        assert_eq!(parse_decimal("1e-2").value, dec!(0.01));

        let bad = parse_decimal("n/a");
        assert!(bad.is_degraded());
        assert_eq!(bad.value, Decimal::ZERO);
    }
}
