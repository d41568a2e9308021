use rusqlite::types::Value;

use crate::error::DriverError;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `DriverError` if the column cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row<'_>, idx: usize) -> Result<RowValues, DriverError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Read every column of `row` in statement order.
///
/// # Errors
///
/// Returns `DriverError` if any column cannot be read.
pub fn sqlite_extract_row(row: &rusqlite::Row<'_>, width: usize) -> Result<Vec<RowValues>, DriverError> {
    let mut values = Vec::with_capacity(width);
    for idx in 0..width {
        values.push(sqlite_extract_value(row, idx)?);
    }
    Ok(values)
}
