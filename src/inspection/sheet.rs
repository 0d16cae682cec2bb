#![cfg(feature = "excel")]

//! Inspection of workbook sources (`.xlsx`, `.xls`, `.ods`, ...).
//!
//! The first sheet's declared cell types drive column types directly, so no
//! delimiter heuristics are needed; header detection reuses the same
//! not-parseable-as-data test as text files. Date cells are normalized here:
//! legacy formats expose dates as numeric serials while XML-based formats
//! carry resolved datetimes, and both become [`Value::Date`] so the rest of
//! the pipeline sees a single date representation.

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{ImportError, ImportResult};
use crate::types::{default_column_name, ColumnDescriptor, ColumnType, InferredSchema, TextLayout, Value};

/// Inspect the first sheet of a workbook, sampling at most `sample_size` rows.
pub fn inspect_sheet(path: &Path, sample_size: usize) -> ImportResult<InferredSchema> {
    let empty = || ImportError::EmptySource {
        path: path.to_path_buf(),
    };

    // calamine folds open failures into its own error type; report a missing
    // file as an unreadable source like the text inspector does.
    if !path.exists() {
        return Err(ImportError::SourceUnreadable {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }

    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook.sheet_names().first().cloned().ok_or_else(empty)?;
    let range = workbook.worksheet_range(&sheet)?;

    let rows: Vec<&[Data]> = range.rows().take(sample_size.max(1)).collect();
    if rows.is_empty() {
        return Err(empty());
    }

    let has_header = detect_header(&rows);
    let (header, data) = if has_header {
        (Some(rows[0]), &rows[1..])
    } else {
        (None, rows.as_slice())
    };
    if data.is_empty() {
        return Err(empty());
    }

    let ncols = range.width();
    let mut used: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(ncols);
    for col in 0..ncols {
        let label = header
            .and_then(|h| h.get(col))
            .map(cell_to_string)
            .unwrap_or_default();
        let trimmed = label.trim();
        let base = if trimmed.is_empty() {
            default_column_name(col)
        } else {
            trimmed.to_owned()
        };
        let mut name = base.clone();
        let mut suffix = 2;
        while !used.insert(name.clone()) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }

        let max_length = data
            .iter()
            .map(|r| r.get(col).map_or(0, |c| cell_to_string(c).chars().count()))
            .max()
            .unwrap_or(0);

        columns.push(ColumnDescriptor {
            name,
            ty: column_type(data, col),
            max_length,
        });
    }

    Ok(InferredSchema {
        layout: TextLayout::Sheet,
        has_header,
        columns,
    })
}

/// Row 1 is a header when at least one column below it carries a declared
/// non-string type and no such column's row-1 cell is of that type.
fn detect_header(rows: &[&[Data]]) -> bool {
    if rows.len() < 2 {
        return false;
    }
    let ncols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let data = &rows[1..];

    let mut any_typed = false;
    for col in 0..ncols {
        let ty = column_type(data, col);
        if ty == ColumnType::String {
            continue;
        }
        any_typed = true;
        let first = rows[0].get(col).unwrap_or(&Data::Empty);
        if declared_type(first) == Some(ty) {
            return false;
        }
    }
    any_typed
}

/// Unify a column's declared cell types: equal types keep, integer and
/// decimal widen to decimal, anything else mixed collapses to string.
fn column_type(data: &[&[Data]], col: usize) -> ColumnType {
    let mut ty: Option<ColumnType> = None;
    for row in data {
        let cell = row.get(col).unwrap_or(&Data::Empty);
        let Some(next) = declared_type(cell) else {
            continue;
        };
        ty = Some(match ty {
            None => next,
            Some(current) if current == next => current,
            Some(ColumnType::Integer) if next == ColumnType::Decimal => ColumnType::Decimal,
            Some(ColumnType::Decimal) if next == ColumnType::Integer => ColumnType::Decimal,
            Some(_) => return ColumnType::String,
        });
    }
    ty.unwrap_or(ColumnType::String)
}

fn declared_type(cell: &Data) -> Option<ColumnType> {
    match cell {
        Data::Empty => None,
        Data::Int(_) => Some(ColumnType::Integer),
        Data::Float(_) => Some(ColumnType::Decimal),
        Data::Bool(_) => Some(ColumnType::Boolean),
        Data::DateTime(_) | Data::DateTimeIso(_) => Some(ColumnType::Date),
        Data::String(_) | Data::DurationIso(_) | Data::Error(_) => Some(ColumnType::String),
    }
}

/// Convert a cell to the typed [`Value`] its column calls for, degrading to
/// the cell's string rendering when the cell does not fit the column type.
pub(crate) fn cell_to_value(cell: &Data, ty: ColumnType) -> Value {
    if matches!(cell, Data::Empty) {
        return Value::Null;
    }
    match ty {
        ColumnType::String => Value::String(cell_to_string(cell)),
        ColumnType::Integer => match cell {
            Data::Int(i) => Value::Integer(*i),
            Data::Float(f) if f.fract() == 0.0 => Value::Integer(*f as i64),
            _ => Value::coerce(&cell_to_string(cell), ty),
        },
        ColumnType::Decimal => match cell {
            Data::Int(i) => Value::Decimal(*i as f64),
            Data::Float(f) => Value::Decimal(*f),
            _ => Value::coerce(&cell_to_string(cell), ty),
        },
        ColumnType::Boolean => match cell {
            Data::Bool(b) => Value::Boolean(*b),
            Data::Int(i) => Value::Boolean(*i != 0),
            _ => Value::coerce(&cell_to_string(cell), ty),
        },
        ColumnType::Date => match date_from_cell(cell) {
            Some(date) => Value::Date(date),
            None => Value::String(cell_to_string(cell)),
        },
    }
}

/// Resolve a date cell to a calendar date regardless of the workbook format:
/// numeric serials (legacy binary formats) and ISO datetime strings (XML
/// formats) both land on [`NaiveDate`].
fn date_from_cell(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) => parse_iso_date(s),
        Data::String(s) => crate::types::parse_date(s.trim()),
        _ => None,
    }
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.date())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        // Keep one textual date representation as well.
        Data::DateTime(_) | Data::DateTimeIso(_) => match date_from_cell(cell) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}
