//! Resource units and value conversion

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Unit a Limes resource is measured in
///
/// Countable resources (instances, cores, ...) have [`Unit::None`]. Measured
/// resources use one of the binary byte units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    /// Countable resource without a unit
    #[default]
    None,
    /// Bytes
    Bytes,
    /// 1024 bytes
    Kibibytes,
    /// 1024^2 bytes
    Mebibytes,
    /// 1024^3 bytes
    Gibibytes,
    /// 1024^4 bytes
    Tebibytes,
    /// 1024^5 bytes
    Pebibytes,
    /// 1024^6 bytes
    Exbibytes,
}

impl Unit {
    /// All measured units, smallest first
    pub const MEASURED: [Self; 7] = [
        Self::Bytes,
        Self::Kibibytes,
        Self::Mebibytes,
        Self::Gibibytes,
        Self::Tebibytes,
        Self::Pebibytes,
        Self::Exbibytes,
    ];

    /// Unit name as used in the Limes API
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Bytes => "B",
            Self::Kibibytes => "KiB",
            Self::Mebibytes => "MiB",
            Self::Gibibytes => "GiB",
            Self::Tebibytes => "TiB",
            Self::Pebibytes => "PiB",
            Self::Exbibytes => "EiB",
        }
    }

    /// Size of one unit in bytes, `None` for countable resources
    #[must_use]
    pub const fn base(self) -> Option<u64> {
        let exponent = match self {
            Self::None => return None,
            Self::Bytes => 0,
            Self::Kibibytes => 1,
            Self::Mebibytes => 2,
            Self::Gibibytes => 3,
            Self::Tebibytes => 4,
            Self::Pebibytes => 5,
            Self::Exbibytes => 6,
        };
        Some(1u64 << (10 * exponent))
    }

    /// Whether this is a byte unit
    #[must_use]
    pub const fn is_measured(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Parse a unit name
    ///
    /// # Errors
    /// Returns [`Error::UnknownUnit`] for names Limes does not use
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "" => Ok(Self::None),
            "B" => Ok(Self::Bytes),
            "KiB" => Ok(Self::Kibibytes),
            "MiB" => Ok(Self::Mebibytes),
            "GiB" => Ok(Self::Gibibytes),
            "TiB" => Ok(Self::Tebibytes),
            "PiB" => Ok(Self::Pebibytes),
            "EiB" => Ok(Self::Exbibytes),
            other => Err(Error::UnknownUnit(other.to_string())),
        }
    }

    /// Convert a decimal `amount` given in `from` into an integer amount of `to`
    ///
    /// `amount` is written as digits with an optional `.` fraction. The
    /// integer part is scaled with checked `u64` arithmetic and the fraction
    /// is scaled exactly, so the result is the floor of the true value.
    /// Conversions between a countable and a measured unit fail, as do
    /// conversions from a unit that is finer than `to`.
    ///
    /// # Errors
    /// Returns [`Error::IncompatibleUnits`], [`Error::UnitTooSmall`],
    /// [`Error::InvalidNumber`] or [`Error::ValueOutOfRange`]
    pub fn convert(amount: &str, from: Self, to: Self) -> Result<u64> {
        let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
            return Err(Error::InvalidNumber(amount.to_string()));
        }

        let factor = if from == to {
            1
        } else {
            match (from.base(), to.base()) {
                (Some(from_base), Some(to_base)) => {
                    if from_base < to_base {
                        return Err(Error::UnitTooSmall { from, to });
                    }
                    from_base / to_base
                }
                _ => return Err(Error::IncompatibleUnits { from, to }),
            }
        };

        let out_of_range = || Error::ValueOutOfRange(format!("{amount}{}", from.as_str()));
        let whole: u64 = whole.parse().map_err(|_| out_of_range())?;
        whole
            .checked_mul(factor)
            .and_then(|scaled| scaled.checked_add(scale_fraction(fraction, factor)))
            .ok_or_else(out_of_range)
    }

    /// Scale a value in `from` into `to` for display purposes
    ///
    /// Unlike [`Unit::convert`] this allows fractional results and
    /// conversions towards finer units. Countable values are returned as-is.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_display(value: u64, from: Self, to: Self) -> f64 {
        match (from.base(), to.base()) {
            (Some(from_base), Some(to_base)) => {
                value as f64 * (from_base as f64 / to_base as f64)
            }
            _ => value as f64,
        }
    }

    /// Largest unit, not smaller than `unit`, in which `value` is at least 1
    #[must_use]
    pub fn humanize(value: u64, unit: Self) -> Self {
        let Some(base) = unit.base() else {
            return unit;
        };

        let bytes = u128::from(value) * u128::from(base);
        Self::MEASURED
            .iter()
            .copied()
            .filter(|candidate| candidate.base() >= Some(base))
            .take_while(|candidate| {
                candidate
                    .base()
                    .is_some_and(|candidate_base| bytes >= u128::from(candidate_base))
            })
            .last()
            .unwrap_or(unit)
    }
}

/// Floor of `0.<fraction> * factor` for a power-of-two `factor`
///
/// Doubles the decimal fraction once per bit of `factor`, collecting the
/// digits carried out of it as the bits of the result.
fn scale_fraction(fraction: &str, factor: u64) -> u64 {
    let mut digits: Vec<u8> = fraction.bytes().map(|b| b - b'0').collect();
    let mut scaled = 0;
    for _ in 0..factor.trailing_zeros() {
        let mut carry = 0;
        for digit in digits.iter_mut().rev() {
            let doubled = *digit * 2 + carry;
            *digit = doubled % 10;
            carry = doubled / 10;
        }
        scaled = (scaled << 1) | u64::from(carry);
    }
    scaled
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "(none)"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Unit {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_names() {
        for unit in Unit::MEASURED {
            assert_eq!(Unit::parse(unit.as_str()).unwrap(), unit);
        }
        assert_eq!(Unit::parse("").unwrap(), Unit::None);
        assert!(Unit::parse("GB").is_err());
        assert!(Unit::parse("gib").is_err());
    }

    #[test]
    fn unit_bases() {
        assert_eq!(Unit::None.base(), None);
        assert_eq!(Unit::Bytes.base(), Some(1));
        assert_eq!(Unit::Mebibytes.base(), Some(1_048_576));
        assert_eq!(Unit::Exbibytes.base(), Some(1 << 60));
    }

    #[test]
    fn convert_to_smaller_unit() {
        assert_eq!(Unit::convert("2", Unit::Gibibytes, Unit::Mebibytes), Ok(2048));
        assert_eq!(Unit::convert("1.5", Unit::Gibibytes, Unit::Mebibytes), Ok(1536));
        assert_eq!(Unit::convert("1", Unit::Tebibytes, Unit::Bytes), Ok(1 << 40));
        assert_eq!(Unit::convert("0.25", Unit::Exbibytes, Unit::Pebibytes), Ok(256));
    }

    #[test]
    fn convert_truncates() {
        assert_eq!(Unit::convert("1.0001", Unit::Kibibytes, Unit::Bytes), Ok(1024));
        assert_eq!(Unit::convert("1.999", Unit::Kibibytes, Unit::Bytes), Ok(2046));
        assert_eq!(Unit::convert("2.7", Unit::Gibibytes, Unit::Gibibytes), Ok(2));
        assert_eq!(Unit::convert("3.9", Unit::None, Unit::None), Ok(3));
    }

    #[test]
    fn convert_keeps_large_integers_exact() {
        assert_eq!(
            Unit::convert("9007199254740993", Unit::Bytes, Unit::Bytes),
            Ok(9_007_199_254_740_993)
        );
        assert_eq!(
            Unit::convert("18446744073709551615", Unit::Bytes, Unit::Bytes),
            Ok(u64::MAX)
        );
        assert_eq!(
            Unit::convert("8796093022207.5", Unit::Mebibytes, Unit::Kibibytes),
            Ok(9_007_199_254_740_480)
        );
        assert_eq!(
            Unit::convert("15.9999999999999999999", Unit::Exbibytes, Unit::Bytes),
            Ok(u64::MAX)
        );
    }

    #[test]
    fn convert_rejects_finer_source() {
        assert_eq!(
            Unit::convert("4096", Unit::Kibibytes, Unit::Mebibytes),
            Err(Error::UnitTooSmall {
                from: Unit::Kibibytes,
                to: Unit::Mebibytes
            })
        );
    }

    #[test]
    fn convert_rejects_countable_mix() {
        assert_eq!(
            Unit::convert("1", Unit::Gibibytes, Unit::None),
            Err(Error::IncompatibleUnits {
                from: Unit::Gibibytes,
                to: Unit::None
            })
        );
        assert!(Unit::convert("1", Unit::None, Unit::Bytes).is_err());
    }

    #[test]
    fn convert_rejects_malformed_numbers() {
        for amount in ["", ".5", "1.2.3", "-1", "1e3", "one"] {
            assert_eq!(
                Unit::convert(amount, Unit::Gibibytes, Unit::Mebibytes),
                Err(Error::InvalidNumber(amount.to_string())),
                "{amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn convert_overflow_reports_input() {
        assert_eq!(
            Unit::convert("16", Unit::Exbibytes, Unit::Bytes),
            Err(Error::ValueOutOfRange("16EiB".to_string()))
        );
        assert_eq!(
            Unit::convert("18446744073709551616", Unit::Bytes, Unit::Bytes),
            Err(Error::ValueOutOfRange("18446744073709551616B".to_string()))
        );
    }

    #[test]
    fn humanize_picks_largest_whole_unit() {
        assert_eq!(Unit::humanize(2048, Unit::Mebibytes), Unit::Gibibytes);
        assert_eq!(Unit::humanize(1023, Unit::Mebibytes), Unit::Mebibytes);
        assert_eq!(Unit::humanize(0, Unit::Mebibytes), Unit::Mebibytes);
        assert_eq!(Unit::humanize(5 << 40, Unit::Bytes), Unit::Tebibytes);
        assert_eq!(Unit::humanize(12, Unit::None), Unit::None);
    }

    #[test]
    fn display_conversion() {
        assert!((Unit::to_display(1536, Unit::Mebibytes, Unit::Gibibytes) - 1.5).abs() < f64::EPSILON);
        assert!((Unit::to_display(2, Unit::Gibibytes, Unit::Mebibytes) - 2048.0).abs() < f64::EPSILON);
        assert!((Unit::to_display(7, Unit::None, Unit::Gibibytes) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unit_serde() {
        let json = serde_json::to_string(&Unit::Gibibytes).unwrap();
        assert_eq!(json, "\"GiB\"");
        let unit: Unit = serde_json::from_str("\"\"").unwrap();
        assert_eq!(unit, Unit::None);
        assert!(serde_json::from_str::<Unit>("\"GB\"").is_err());
    }
}
