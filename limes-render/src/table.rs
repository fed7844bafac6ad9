//! Table and CSV output

use prettytable::{Row, Table, format};
use serde::Serialize;
use std::io::Write;

use crate::{OutputFormat, RenderError, RenderOptions, Result};

/// A report that can be printed as rows
pub trait Tabular: Serialize {
    /// Column titles
    fn headers(&self, long: bool) -> Vec<&'static str>;

    /// One row per resource (or rate), matching [`Tabular::headers`]
    fn rows(&self, options: &RenderOptions) -> Vec<Vec<String>>;
}

fn build_table<T: Tabular + ?Sized>(report: &T, options: &RenderOptions) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::from(report.headers(options.long)));
    for row in report.rows(options) {
        table.add_row(Row::from(row));
    }
    table
}

/// Print a report to `out` in the requested format
pub fn render<T, W>(out: &mut W, report: &T, options: &RenderOptions) -> Result<()>
where
    T: Tabular + ?Sized,
    W: Write,
{
    match options.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let table = build_table(report, options);
            table
                .to_csv(&mut *out)
                .map_err(|e| RenderError::Csv(e.to_string()))?
                .flush()?;
        }
        OutputFormat::Table => {
            let table = build_table(report, options);
            table.print(out)?;
        }
    }
    Ok(())
}
