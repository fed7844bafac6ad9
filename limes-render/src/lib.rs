//! Rendering of Limes reports
//!
//! Reports are printed in one of three formats:
//! - `table` - human-readable ASCII table
//! - `csv` - the same rows as comma-separated values
//! - `json` - the report itself, pretty-printed
//!
//! Every report type implements [`Tabular`], which describes the table
//! columns and produces one row per resource (or rate).

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod error;
pub mod options;
pub mod reports;
pub mod table;
pub mod value;

pub use error::{RenderError, Result};
pub use options::{OutputFormat, RenderOptions, UnitMode};
pub use reports::{ProjectRatesReports, ProjectReports};
pub use table::{Tabular, render};
