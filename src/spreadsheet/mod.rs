//! In-memory XLSX writer.
//!
//! Produces a single-sheet workbook from a frame of string columns: a bold
//! header row followed by one row per frame row. Every cell is an inline
//! string, so values are kept exactly as extracted.

mod package;
mod sheet;

use crate::constants::{MAX_SHEET_COLUMNS, MAX_SHEET_ROWS};
use crate::errors::{AppError, AppResult};
use polars::prelude::DataFrame;

/// Writes `df` as an XLSX package and returns the bytes.
///
/// # Errors
///
/// Returns `SerializationError` if the frame does not fit on one sheet or the
/// package cannot be assembled.
pub fn write_workbook(df: &DataFrame) -> AppResult<Vec<u8>> {
    check_grid_size(df.height(), df.width())?;
    let sheet_xml = sheet::worksheet_xml(df)?;
    package::write_package(&sheet_xml)
}

fn check_grid_size(rows: usize, columns: usize) -> AppResult<()> {
    // One row is taken by the header
    if rows + 1 > MAX_SHEET_ROWS {
        return Err(AppError::SerializationError(format!(
            "{rows} records exceed the sheet limit of {} rows",
            MAX_SHEET_ROWS - 1
        )));
    }
    if columns > MAX_SHEET_COLUMNS {
        return Err(AppError::SerializationError(format!(
            "{columns} fields exceed the sheet limit of {MAX_SHEET_COLUMNS} columns"
        )));
    }
    Ok(())
}
