//! Output options

use clap::ValueEnum;
use limes_core::Unit;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Comma-separated values
    Csv,
    /// Pretty-printed JSON
    Json,
}

/// How measured values are scaled for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnitMode {
    /// The resource's own unit
    #[default]
    Native,
    /// The largest unit in which the row's largest value is at least 1
    Humanize,
    /// A fixed unit for every measured resource
    Fixed(Unit),
}

impl UnitMode {
    /// Unit mode from the `--humanize` and `--unit` flags
    ///
    /// Both flags are mutually exclusive on the command line, `--unit`
    /// wins here if both are set anyway.
    #[must_use]
    pub const fn from_flags(humanize: bool, unit: Option<Unit>) -> Self {
        match (humanize, unit) {
            (_, Some(unit)) => Self::Fixed(unit),
            (true, None) => Self::Humanize,
            (false, None) => Self::Native,
        }
    }

    /// Unit to display a row in, given the resource unit and the row values
    #[must_use]
    pub fn display_unit(self, unit: Unit, values: &[Option<u64>]) -> Unit {
        if !unit.is_measured() {
            return unit;
        }
        match self {
            Self::Native => unit,
            Self::Fixed(target) if target.is_measured() => target,
            Self::Fixed(_) => unit,
            Self::Humanize => {
                let max = values.iter().flatten().copied().max().unwrap_or(0);
                Unit::humanize(max, unit)
            }
        }
    }
}

/// Everything that influences how a report is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output format
    pub format: OutputFormat,
    /// Include the extra columns
    pub long: bool,
    /// Value scaling
    pub unit_mode: UnitMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_to_mode() {
        assert_eq!(UnitMode::from_flags(false, None), UnitMode::Native);
        assert_eq!(UnitMode::from_flags(true, None), UnitMode::Humanize);
        assert_eq!(
            UnitMode::from_flags(false, Some(Unit::Gibibytes)),
            UnitMode::Fixed(Unit::Gibibytes)
        );
    }

    #[test]
    fn countable_rows_are_untouched() {
        let values = [Some(1 << 30)];
        assert_eq!(UnitMode::Humanize.display_unit(Unit::None, &values), Unit::None);
        assert_eq!(
            UnitMode::Fixed(Unit::Gibibytes).display_unit(Unit::None, &values),
            Unit::None
        );
    }

    #[test]
    fn humanize_uses_row_maximum() {
        let values = [Some(512), None, Some(3 * 1024)];
        assert_eq!(
            UnitMode::Humanize.display_unit(Unit::Mebibytes, &values),
            Unit::Gibibytes
        );
        assert_eq!(
            UnitMode::Humanize.display_unit(Unit::Mebibytes, &[None]),
            Unit::Mebibytes
        );
    }
}
