//! Inspection of delimited and fixed-width text files.
//!
//! The inspector reads a bounded prefix of the file, finds the delimiter that
//! splits every sampled record into the same multi-field count (quote-aware,
//! via the csv crate), and falls back to fixed-width boundary inference from
//! whitespace runs that line up across the sample when no delimiter fits.
//! Header presence, column names, per-column types, and maximum string
//! lengths are then inferred from the sampled rows.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ImportError, ImportResult};
use crate::types::{
    default_column_name, parses_as, ColumnDescriptor, ColumnType, InferredSchema, TextLayout,
};

/// Delimiters tested, in order, before falling back to fixed-width.
const DELIMITER_CANDIDATES: &[u8] = &[b',', b'|', b'\t'];

/// Non-string candidate types, narrowest first.
const TYPE_CANDIDATES: &[ColumnType] = &[
    ColumnType::Boolean,
    ColumnType::Integer,
    ColumnType::Decimal,
    ColumnType::Date,
];

/// Inspect a text file, sampling at most `sample_size` leading lines.
pub fn inspect_text(path: &Path, sample_size: usize) -> ImportResult<InferredSchema> {
    let (sample, reached_eof) = read_sample(path, sample_size)?;
    if sample.trim().is_empty() {
        return Err(ImportError::EmptySource {
            path: path.to_path_buf(),
        });
    }

    if let Some((delimiter, rows)) = detect_delimiter(&sample, reached_eof) {
        return build_schema(path, TextLayout::Delimited { delimiter }, rows);
    }

    let lines: Vec<&str> = sample.lines().filter(|l| !l.trim().is_empty()).collect();
    let bounds = fixed_width_bounds(&lines);
    let rows: Vec<Vec<String>> = lines.iter().map(|l| split_fixed(l, &bounds)).collect();
    build_schema(path, TextLayout::FixedWidth { bounds }, rows)
}

/// Read up to `sample_size` lines. Returns the sampled text and whether the
/// end of the file was reached inside the window.
fn read_sample(path: &Path, sample_size: usize) -> ImportResult<(String, bool)> {
    let unreadable = |source: std::io::Error| ImportError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;
    let mut reader = BufReader::new(file);

    let mut sample = String::new();
    let mut reached_eof = false;
    for _ in 0..sample_size.max(1) {
        let mut line = String::new();
        if reader.read_line(&mut line).map_err(unreadable)? == 0 {
            reached_eof = true;
            break;
        }
        sample.push_str(&line);
    }
    Ok((sample, reached_eof))
}

/// Try each candidate delimiter against the sample and return the winner with
/// its parsed rows.
///
/// A candidate qualifies when every sampled record splits into the same
/// count of fields, and that count is greater than one. Quoting follows
/// standard CSV semantics, so a quoted field may contain the delimiter or
/// embedded newlines without breaking the count. Among qualifying candidates
/// the highest field count wins, ties broken by candidate order.
fn detect_delimiter(sample: &str, reached_eof: bool) -> Option<(u8, Vec<Vec<String>>)> {
    let mut best: Option<(u8, Vec<Vec<String>>)> = None;

    for &candidate in DELIMITER_CANDIDATES {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(candidate)
            .has_headers(false)
            .flexible(true)
            .from_reader(sample.as_bytes());

        let mut records: Vec<Vec<String>> = Vec::new();
        let mut parse_failed = false;
        for record in reader.records() {
            match record {
                Ok(r) => records.push(r.iter().map(str::to_owned).collect()),
                Err(_) => {
                    parse_failed = true;
                    break;
                }
            }
        }
        if parse_failed {
            continue;
        }
        // When the sample window stopped before the end of the file, the last
        // record may have been cut inside a quoted field.
        if !reached_eof {
            records.pop();
        }

        let Some(first) = records.first() else {
            continue;
        };
        let width = first.len();
        if width <= 1 || records.iter().any(|r| r.len() != width) {
            continue;
        }
        let beats_best = best
            .as_ref()
            .is_none_or(|(_, rows)| width > rows[0].len());
        if beats_best {
            best = Some((candidate, records));
        }
    }

    best
}

/// Infer fixed-width column bounds from the positions where every sampled
/// line has whitespace (or has already ended). Returns half-open `(start,
/// end)` ranges; the final column is left open-ended so longer rows in the
/// full pass keep their tails.
fn fixed_width_bounds(lines: &[&str]) -> Vec<(usize, usize)> {
    let rows: Vec<Vec<char>> = lines.iter().map(|l| l.chars().collect()).collect();
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);

    let is_gap = |i: usize| {
        rows.iter()
            .all(|r| r.get(i).is_none_or(|c| c.is_whitespace()))
    };

    let mut bounds = Vec::new();
    let mut start: Option<usize> = None;
    for i in 0..width {
        match (is_gap(i), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                bounds.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        bounds.push((s, width));
    }
    if let Some(last) = bounds.last_mut() {
        last.1 = usize::MAX;
    }
    bounds
}

/// Cut a line at fixed bounds, trimming the padding off each field.
pub(crate) fn split_fixed(line: &str, bounds: &[(usize, usize)]) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    bounds
        .iter()
        .map(|&(start, end)| {
            let end = end.min(chars.len());
            let start = start.min(end);
            chars[start..end].iter().collect::<String>().trim().to_owned()
        })
        .collect()
}

/// Decide whether the first sampled row is a header.
///
/// The first row is a header when at least one column's type inferred from
/// the remaining rows is narrower than string and no such column's first-row
/// cell parses as that type. Blank first-row cells are allowed (they later
/// pick up positional default names), and a sample whose every column is
/// free text is treated as headerless.
fn detect_header(rows: &[Vec<String>]) -> bool {
    if rows.len() < 2 {
        return false;
    }
    let ncols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let data = &rows[1..];

    let mut any_typed = false;
    for col in 0..ncols {
        let ty = infer_column_type(data, col);
        if ty == ColumnType::String {
            continue;
        }
        any_typed = true;
        let first = rows[0].get(col).map(|s| s.trim()).unwrap_or("");
        if !first.is_empty() && parses_as(first, ty) {
            return false;
        }
    }
    any_typed
}

/// Infer one column's type: the narrowest candidate every non-empty sampled
/// value parses as, or string when none fits (or the column is all empty).
fn infer_column_type(data: &[Vec<String>], col: usize) -> ColumnType {
    let values = || {
        data.iter()
            .filter_map(|r| r.get(col))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    };

    for &candidate in TYPE_CANDIDATES {
        let mut any = false;
        let mut all = true;
        for value in values() {
            any = true;
            if !parses_as(value, candidate) {
                all = false;
                break;
            }
        }
        if any && all {
            return candidate;
        }
    }
    ColumnType::String
}

fn build_schema(
    path: &Path,
    layout: TextLayout,
    rows: Vec<Vec<String>>,
) -> ImportResult<InferredSchema> {
    let empty = || ImportError::EmptySource {
        path: path.to_path_buf(),
    };
    if rows.is_empty() {
        return Err(empty());
    }

    let has_header = detect_header(&rows);
    let (header, data) = if has_header {
        (Some(rows[0].as_slice()), &rows[1..])
    } else {
        (None, rows.as_slice())
    };
    if data.is_empty() {
        return Err(empty());
    }

    let ncols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut used: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(ncols);
    for col in 0..ncols {
        let trimmed = header
            .and_then(|h| h.get(col))
            .map(|s| s.trim())
            .unwrap_or("");
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
            .filter_map(|r| r.get(col))
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0);

        columns.push(ColumnDescriptor {
            name,
            ty: infer_column_type(data, col),
            max_length,
        });
    }

    Ok(InferredSchema {
        layout,
        has_header,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn comma_beats_pipe_when_pipes_sit_inside_fields() {
        let sample = "Name,WebSite,Created\nGoogle|,http://www.google.com|,9/4/98\nApple|,http://www.apple.com|,4/1/1976\n";
        let (delimiter, parsed) = detect_delimiter(sample, true).unwrap();
        assert_eq!(delimiter, b',');
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1][0], "Google|");
    }

    #[test]
    fn quoted_delimiters_do_not_break_the_field_count() {
        let sample = "Name,Created\n\"Nike, Inc.\",1/25/1964\nApple,4/1/1976\n";
        let (delimiter, parsed) = detect_delimiter(sample, true).unwrap();
        assert_eq!(delimiter, b',');
        assert_eq!(parsed[1][0], "Nike, Inc.");
    }

    #[test]
    fn inconsistent_counts_disqualify_every_candidate() {
        let sample = "Name WebSite\nGoogle\n";
        assert!(detect_delimiter(sample, true).is_none());
    }

    #[test]
    fn truncated_sample_drops_the_last_record() {
        // Window ended mid-file; the final record may be cut inside a quote.
        let sample = "a,b\nc,d\n\"e,f";
        let (_, parsed) = detect_delimiter(sample, false).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn aligned_whitespace_runs_become_column_bounds() {
        let lines = vec![
            "Name      WebSite                   Created",
            "Google    http://www.google.com     9/4/98",
            "Apple     http://www.apple.com      4/1/1976",
            "Microsoft http://www.microsoft.com  4/4/1975",
        ];
        let bounds = fixed_width_bounds(&lines);
        assert_eq!(bounds.len(), 3);
        assert_eq!(bounds[0].0, 0);
        assert_eq!(split_fixed(lines[3], &bounds), vec![
            "Microsoft".to_owned(),
            "http://www.microsoft.com".to_owned(),
            "4/4/1975".to_owned(),
        ]);
    }

    #[test]
    fn no_aligned_gaps_degrades_to_one_column() {
        let lines = vec!["abc def", "abcdefgh", "ab cd ef"];
        let bounds = fixed_width_bounds(&lines);
        assert_eq!(bounds.len(), 1);
        assert_eq!(split_fixed(lines[0], &bounds), vec!["abc def".to_owned()]);
    }

    #[test]
    fn header_detected_when_typed_columns_do_not_parse_in_row_one() {
        let sample = rows(&[
            &["Name", "WebSite", "Created"],
            &["Google", "http://www.google.com", "9/4/98"],
            &["Apple", "http://www.apple.com", "4/1/1976"],
        ]);
        assert!(detect_header(&sample));
    }

    #[test]
    fn first_row_that_parses_as_data_is_not_a_header() {
        let sample = rows(&[
            &["Google", "http://www.google.com", "9/4/98"],
            &["Apple", "http://www.apple.com", "4/1/1976"],
        ]);
        assert!(!detect_header(&sample));
    }

    #[test]
    fn all_string_sample_is_headerless() {
        let sample = rows(&[
            &["Name", "WebSite"],
            &["Google", "http://www.google.com"],
        ]);
        assert!(!detect_header(&sample));
    }

    #[test]
    fn blank_header_cells_still_allow_header_detection() {
        let sample = rows(&[
            &["", "", "Created"],
            &["Google", "http://www.google.com", "9/4/98"],
            &["Apple", "http://www.apple.com", "4/1/1976"],
        ]);
        assert!(detect_header(&sample));
    }

    #[test]
    fn column_types_take_the_narrowest_fit() {
        let data = rows(&[
            &["1", "1.5", "true", "9/4/98", "mixed"],
            &["22", "2", "false", "4/1/1976", "7"],
        ]);
        assert_eq!(infer_column_type(&data, 0), ColumnType::Integer);
        assert_eq!(infer_column_type(&data, 1), ColumnType::Decimal);
        assert_eq!(infer_column_type(&data, 2), ColumnType::Boolean);
        assert_eq!(infer_column_type(&data, 3), ColumnType::Date);
        assert_eq!(infer_column_type(&data, 4), ColumnType::String);
    }
}
