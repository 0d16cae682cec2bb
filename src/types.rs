//! Core data model for inspection and loading.
//!
//! An inspection produces an [`InferredSchema`]: an ordered list of
//! [`ColumnDescriptor`]s plus the [`TextLayout`] the file was read with. The
//! load pass coerces every raw field into a typed [`Value`] according to its
//! column's [`ColumnType`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date formats accepted during inference and coercion, tried in order.
///
/// The set is fixed (no locale-dependent parsing) so inspection results are
/// reproducible across environments. Two-digit-year forms come before their
/// four-digit siblings so `9/4/98` resolves to 1998 rather than year 98.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%B, %d %Y",
    "%B %d, %Y",
];

/// Logical column type inferred from (or forced onto) a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text, sized by the maximum observed length.
    String,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating point number.
    Decimal,
    /// Calendar date (see [`DATE_FORMATS`]).
    Date,
    /// Boolean.
    Boolean,
}

impl ColumnType {
    /// Parse a type name from the supported type set, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "integer" | "int" => Some(Self::Integer),
            "decimal" => Some(Self::Decimal),
            "date" => Some(Self::Date),
            "boolean" | "bool" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// Canonical lowercase name, used in fingerprints and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::Boolean => "boolean",
        }
    }
}

/// A single named, typed column in an [`InferredSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, unique within the schema.
    pub name: String,
    /// Inferred (or overridden) column type.
    pub ty: ColumnType,
    /// Maximum observed character length across the sample. Only meaningful
    /// for string columns.
    pub max_length: usize,
}

impl ColumnDescriptor {
    /// Declared storage length for string columns: the observed maximum plus
    /// a safety margin, never below 16 characters.
    pub fn storage_length(&self) -> usize {
        (self.max_length * 3 / 2).max(16)
    }
}

/// How the source file's rows are physically laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextLayout {
    /// Fields separated by a literal delimiter byte, standard CSV quoting.
    Delimited { delimiter: u8 },
    /// Fields cut at fixed character positions; `bounds` holds half-open
    /// `(start, end)` column ranges.
    FixedWidth { bounds: Vec<(usize, usize)> },
    /// Cells read from the first sheet of a workbook.
    Sheet,
}

/// The result of inspecting a source file: layout, header presence, and an
/// ordered column list. Produced once per fingerprint and owned (serialized)
/// by the inspection cache; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredSchema {
    /// Physical row layout discovered during inspection.
    pub layout: TextLayout,
    /// Whether the first row of the source is a header and must be skipped
    /// during the full read pass.
    pub has_header: bool,
    /// Ordered column descriptors.
    pub columns: Vec<ColumnDescriptor>,
}

impl InferredSchema {
    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// A single typed cell value produced by the load pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// Free text (also the fallback when coercion fails).
    String(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Decimal(f64),
    /// Calendar date.
    Date(NaiveDate),
    /// Boolean.
    Boolean(bool),
}

impl Value {
    /// Coerce a raw field into `ty`.
    ///
    /// Empty (after trimming) becomes [`Value::Null`]. A value that fails to
    /// parse as `ty` degrades to its raw string form instead of failing: the
    /// load favors completing an import with some loosely-typed values over
    /// aborting the row.
    pub fn coerce(raw: &str, ty: ColumnType) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Null;
        }
        match ty {
            ColumnType::String => Self::String(raw.to_owned()),
            ColumnType::Integer => match parse_integer(trimmed) {
                Some(v) => Self::Integer(v),
                None => Self::String(raw.to_owned()),
            },
            ColumnType::Decimal => match parse_decimal(trimmed) {
                Some(v) => Self::Decimal(v),
                None => Self::String(raw.to_owned()),
            },
            ColumnType::Date => match parse_date(trimmed) {
                Some(v) => Self::Date(v),
                None => Self::String(raw.to_owned()),
            },
            ColumnType::Boolean => match parse_boolean_loose(trimmed) {
                Some(v) => Self::Boolean(v),
                None => Self::String(raw.to_owned()),
            },
        }
    }
}

/// Whether `raw` parses as `ty`. Used both by type inference over the sample
/// and by the header test (a header cell is one that does *not* parse as the
/// type inferred from the rows below it).
pub(crate) fn parses_as(raw: &str, ty: ColumnType) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return true;
    }
    match ty {
        ColumnType::String => true,
        ColumnType::Integer => parse_integer(trimmed).is_some(),
        ColumnType::Decimal => parse_decimal(trimmed).is_some(),
        ColumnType::Date => parse_date(trimmed).is_some(),
        // Inference is strict about booleans so 0/1 columns stay integers.
        ColumnType::Boolean => parse_boolean_strict(trimmed).is_some(),
    }
}

pub(crate) fn parse_integer(s: &str) -> Option<i64> {
    s.parse::<i64>().ok()
}

pub(crate) fn parse_decimal(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_boolean_strict(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_boolean_loose(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Positional default column name: A, B, ..., Z, AA, AB, ...
pub(crate) fn default_column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_else(|_| format!("C{index}"))
}
