// src/output.rs

use chrono::Local;
use clap::ValueEnum;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use prettytable::{format, Cell, Row, Table as PrettyTable};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::info;

use crate::error::Result;
use crate::extract::{Mode, Table};

const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Extra output targets beyond the default plain print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Pretty,
    File,
}

/// Render `table` the way the run asked for. Returns the CSV path in file mode.
pub fn control_output(
    table: &Table,
    output: Option<OutputMode>,
    mode: Mode,
    results_dir: &Path,
) -> Result<Option<PathBuf>> {
    match output {
        Some(OutputMode::Pretty) => {
            pretty_output(table).printstd();
            Ok(None)
        }
        Some(OutputMode::File) => file_output(table, mode, results_dir).map(Some),
        None => {
            default_output(table, &mut io::stdout().lock())?;
            Ok(None)
        }
    }
}

/// One line per row, fields separated by a space.
pub fn default_output(table: &Table, out: &mut impl Write) -> io::Result<()> {
    for row in table.rows() {
        writeln!(out, "{}", row.join(" "))?;
    }
    Ok(())
}

pub fn pretty_output(table: &Table) -> PrettyTable {
    let mut pretty = PrettyTable::new();
    pretty.set_format(*format::consts::FORMAT_DEFAULT);
    pretty.set_titles(Row::new(
        table.header().iter().map(|h| Cell::new(h)).collect(),
    ));
    for row in table.body() {
        pretty.add_row(Row::new(row.iter().map(|f| Cell::new(f)).collect()));
    }
    pretty
}

/// Write every row, header included, to `results/<mode>_<timestamp>.csv`.
pub fn file_output(table: &Table, mode: Mode, results_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(results_dir)?;
    let stamp = Local::now().format(DATETIME_FORMAT);
    let path = results_dir.join(format!("{}_{}.csv", mode, stamp));

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_path(&path)?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), "results saved");
    Ok(path)
}
