//! Input table reader
//!
//! Reads the comma-separated log written by the acquisition side:
//!
//! ```text
//! # exp2, 30 s gate
//! iteration,n_ticks
//! 0,168012
//! 1,168020
//! ```
//!
//! Columns are located by header name, so extra columns and any column order
//! are accepted. Lines starting with `#` and blank lines are ignored. The
//! whole file is read up front; the analysis never holds a handle to a log
//! that is still being appended to.

use crate::error::{AnalysisError, Result};
use crate::series::{MeasurementSeries, Record};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ITERATION_COLUMN: &str = "iteration";
pub const COUNT_COLUMN: &str = "n_ticks";
const COMMENT_MARKER: char = '#';

/// Input table handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Skip undecodable rows with a warning instead of failing
    pub lenient: bool,
}

/// Read and parse a table file
///
/// The file is decoded one line at a time, so a line torn by a serial glitch
/// only affects that row.
pub fn read_table(path: &Path, options: &TableOptions) -> Result<MeasurementSeries> {
    let bytes = std::fs::read(path)?;
    parse_table_bytes(&bytes, options)
}

/// Parse table text into a measurement series
pub fn parse_table(text: &str, options: &TableOptions) -> Result<MeasurementSeries> {
    parse_table_bytes(text.as_bytes(), options)
}

/// Parse raw table bytes; a line that is not valid UTF-8 is a malformed row
pub fn parse_table_bytes(bytes: &[u8], options: &TableOptions) -> Result<MeasurementSeries> {
    let mut lines = bytes
        .split(|b| *b == b'\n')
        .enumerate()
        .map(|(idx, raw)| (idx + 1, decode_line(raw)))
        .filter(|(_, line)| match line {
            Ok(line) => !line.is_empty() && !line.starts_with(COMMENT_MARKER),
            Err(_) => true,
        });

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| AnalysisError::invalid("input table has no header row"))?;
    let header = header.map_err(|message| AnalysisError::Parse {
        line: header_line,
        message,
    })?;
    let columns = Columns::locate(header)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (line_no, line) in lines {
        match line.and_then(|line| columns.parse_row(line)) {
            Ok(record) => records.push(record),
            Err(message) if options.lenient => {
                skipped += 1;
                tracing::warn!(line = line_no, "skipping malformed row: {}", message);
            }
            Err(message) => {
                return Err(AnalysisError::Parse {
                    line: line_no,
                    message,
                })
            }
        }
    }

    if skipped > 0 {
        tracing::info!(skipped, kept = records.len(), "malformed rows skipped");
    }

    MeasurementSeries::new(records)
}

fn decode_line(raw: &[u8]) -> std::result::Result<&str, String> {
    std::str::from_utf8(raw)
        .map(str::trim)
        .map_err(|e| format!("row is not valid UTF-8: {}", e))
}

/// Positions of the required columns in the header
#[derive(Debug, Clone, Copy)]
struct Columns {
    iteration: usize,
    count: usize,
    width: usize,
}

impl Columns {
    fn locate(header: &str) -> Result<Self> {
        let names: Vec<&str> = header.split(',').map(str::trim).collect();
        let find = |wanted: &str| {
            names.iter().position(|n| *n == wanted).ok_or_else(|| {
                AnalysisError::invalid(format!(
                    "input table is missing the '{}' column (header: {})",
                    wanted, header
                ))
            })
        };

        Ok(Self {
            iteration: find(ITERATION_COLUMN)?,
            count: find(COUNT_COLUMN)?,
            width: names.len(),
        })
    }

    fn parse_row(&self, line: &str) -> std::result::Result<Record, String> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != self.width {
            return Err(format!(
                "expected {} fields, found {}",
                self.width,
                fields.len()
            ));
        }

        let iteration = parse_integer(fields[self.iteration], ITERATION_COLUMN)?;
        let count = parse_integer(fields[self.count], COUNT_COLUMN)?;
        if count < 0 {
            return Err(format!("{} must be non-negative, got {}", COUNT_COLUMN, count));
        }

        Ok(Record { iteration, count })
    }
}

fn parse_integer(field: &str, column: &str) -> std::result::Result<i64, String> {
    field
        .parse::<i64>()
        .map_err(|e| format!("invalid {} value '{}': {}", column, field, e))
}
