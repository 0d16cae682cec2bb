//! Schema inspection: the sampling pass that infers a source file's
//! delimiter or fixed-width layout, header presence, column names, per-column
//! types, and per-column maximum string lengths.
//!
//! [`inspect`] dispatches by file extension: workbook extensions go to the
//! spreadsheet inspector (feature-gated behind `excel`), everything else is
//! treated as text and run through delimiter detection with a fixed-width
//! fallback.

pub mod text;

#[cfg(feature = "excel")]
pub mod sheet;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ImportResult;
use crate::types::{ColumnType, InferredSchema, TextLayout};

/// Input provider kind of a load plan's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Delimiter-separated text.
    DelimitedText,
    /// Fixed-width text.
    FixedWidthText,
    /// Workbook (first sheet).
    Spreadsheet,
}

impl SourceKind {
    /// The source kind a schema's layout implies.
    pub fn from_layout(layout: &TextLayout) -> Self {
        match layout {
            TextLayout::Delimited { .. } => Self::DelimitedText,
            TextLayout::FixedWidth { .. } => Self::FixedWidthText,
            TextLayout::Sheet => Self::Spreadsheet,
        }
    }
}

/// Whether `path` names a workbook rather than a text file.
pub(crate) fn is_spreadsheet_path(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("xlsx" | "xls" | "xlsm" | "xlsb" | "ods")
    )
}

/// Inspect `path`, reading at most `sample_size` leading lines (or rows), and
/// apply `types` as positional overrides onto the inferred columns.
///
/// Fails with [`ImportError::SourceUnreadable`](crate::ImportError::SourceUnreadable)
/// when the file cannot be opened and
/// [`ImportError::EmptySource`](crate::ImportError::EmptySource) when no data
/// rows are found.
pub fn inspect(path: &Path, types: &[ColumnType], sample_size: usize) -> ImportResult<InferredSchema> {
    let mut schema = if is_spreadsheet_path(path) {
        inspect_spreadsheet(path, sample_size)?
    } else {
        text::inspect_text(path, sample_size)?
    };
    apply_type_overrides(&mut schema, types);
    Ok(schema)
}

#[cfg(feature = "excel")]
fn inspect_spreadsheet(path: &Path, sample_size: usize) -> ImportResult<InferredSchema> {
    sheet::inspect_sheet(path, sample_size)
}

#[cfg(not(feature = "excel"))]
fn inspect_spreadsheet(path: &Path, _sample_size: usize) -> ImportResult<InferredSchema> {
    let _ = path;
    Err(crate::error::ImportError::UnsupportedProvider(
        "spreadsheet sources require the 'excel' feature".to_owned(),
    ))
}

/// Explicit type overrides take precedence over inferred types, position by
/// position. Columns beyond the override list keep their inferred types.
fn apply_type_overrides(schema: &mut InferredSchema, types: &[ColumnType]) {
    for (column, ty) in schema.columns.iter_mut().zip(types.iter()) {
        column.ty = *ty;
    }
}
