//! Cell formatting

use chrono::{DateTime, SecondsFormat};
use limes_core::Unit;

use crate::OutputFormat;

/// Format a value given in `unit` for display in `display`
///
/// Missing values become empty cells. Converted values keep at most two
/// decimals, with trailing zeros dropped.
#[must_use]
pub fn amount(value: Option<u64>, unit: Unit, display: Unit) -> String {
    let Some(value) = value else {
        return String::new();
    };
    if unit == display {
        return value.to_string();
    }
    decimal(Unit::to_display(value, unit, display))
}

/// Format a signed value (only backend quotas can be negative)
#[must_use]
pub fn signed_amount(value: Option<i64>, unit: Unit, display: Unit) -> String {
    match value {
        Some(v) if v < 0 => v.to_string(),
        Some(v) => amount(u64::try_from(v).ok(), unit, display),
        None => String::new(),
    }
}

/// At most two decimals, trailing zeros trimmed
#[must_use]
pub fn decimal(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Unix timestamp as a cell: RFC 3339 in tables, raw seconds otherwise
#[must_use]
pub fn timestamp(value: Option<i64>, format: OutputFormat) -> String {
    let Some(value) = value else {
        return String::new();
    };
    match format {
        OutputFormat::Table => DateTime::from_timestamp(value, 0).map_or_else(
            || value.to_string(),
            |ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        OutputFormat::Csv | OutputFormat::Json => value.to_string(),
    }
}

/// Optional text as a cell
#[must_use]
pub fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Optional number as a cell
#[must_use]
pub fn number(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals() {
        assert_eq!(decimal(1.5), "1.5");
        assert_eq!(decimal(2.0), "2");
        assert_eq!(decimal(0.333_333), "0.33");
        assert_eq!(decimal(0.004), "0");
        assert_eq!(decimal(1.999), "2");
    }

    #[test]
    fn amounts() {
        assert_eq!(amount(None, Unit::Mebibytes, Unit::Gibibytes), "");
        assert_eq!(amount(Some(1536), Unit::Mebibytes, Unit::Mebibytes), "1536");
        assert_eq!(amount(Some(1536), Unit::Mebibytes, Unit::Gibibytes), "1.5");
        assert_eq!(amount(Some(1), Unit::Gibibytes, Unit::Mebibytes), "1024");
        assert_eq!(signed_amount(Some(-1), Unit::Mebibytes, Unit::Gibibytes), "-1");
        assert_eq!(signed_amount(Some(2048), Unit::Mebibytes, Unit::Gibibytes), "2");
    }

    #[test]
    fn timestamps() {
        assert_eq!(
            timestamp(Some(1_700_000_000), OutputFormat::Table),
            "2023-11-14T22:13:20Z"
        );
        assert_eq!(timestamp(Some(1_700_000_000), OutputFormat::Csv), "1700000000");
        assert_eq!(timestamp(None, OutputFormat::Table), "");
    }
}
