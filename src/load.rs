//! Load execution: the full (non-sampled) read pass.
//!
//! [`execute`] streams every row of the plan's source, coerces each field to
//! its column's inferred type (coercion failures degrade to the raw string
//! rather than aborting the row), and writes batches into the output store.
//! Cancellation is cooperative and honored between batches.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{ImportError, ImportResult};
use crate::inspection::text::split_fixed;
use crate::plan::LoadPlan;
use crate::store::{self, OutputStore};
use crate::types::{InferredSchema, TextLayout, Value};

/// Options controlling load execution.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Rows per insert batch.
    pub batch_size: usize,
    /// Optional caller-supplied cancellation signal, checked between batches.
    /// Cancelling stops the load cleanly with the rows inserted so far.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            batch_size: 1024,
            cancel: None,
        }
    }
}

/// Insert count for one loaded entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLoad {
    /// Entity (table/view) name.
    pub name: String,
    /// Rows inserted.
    pub inserted: usize,
}

/// Outcome of one load: rows inserted for the primary entity, the resolved
/// target table/view name, and per-entity status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadResult {
    /// Rows inserted for the primary entity.
    pub records: usize,
    /// Resolved target table/view name.
    pub view: String,
    /// Per-entity insert counts.
    pub entities: Vec<EntityLoad>,
}

impl LoadResult {
    pub(crate) fn zero(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            ..Self::default()
        }
    }
}

/// Run `plan`: stream, coerce, and write every source row.
///
/// Fails with [`ImportError::TargetUnwritable`] when the output store cannot
/// be created or written, and with a read error when the full pass fails
/// mid-stream. The store connection is released on every exit path.
pub fn execute(plan: &LoadPlan, options: &LoadOptions) -> ImportResult<LoadResult> {
    let table = plan.output.table.as_str();
    let mut store = store::open(&plan.output)?;
    store.prepare(table, &plan.schema)?;

    let mut sink = BatchSink {
        store: store.as_mut(),
        table,
        schema: &plan.schema,
        batch_size: options.batch_size.max(1),
        cancel: options.cancel.as_deref(),
        batch: Vec::new(),
        inserted: 0,
        cancelled: false,
    };

    match &plan.schema.layout {
        TextLayout::Delimited { delimiter } => {
            stream_delimited(&plan.input.path, *delimiter, &plan.schema, &mut sink)?;
        }
        TextLayout::FixedWidth { bounds } => {
            stream_fixed_width(&plan.input.path, bounds, &plan.schema, &mut sink)?;
        }
        TextLayout::Sheet => stream_sheet(&plan.input.path, &plan.schema, &mut sink)?,
    }

    let inserted = sink.finish()?;
    debug!(table, inserted, "load complete");
    Ok(LoadResult {
        records: inserted,
        view: table.to_owned(),
        entities: vec![EntityLoad {
            name: table.to_owned(),
            inserted,
        }],
    })
}

/// Buffers typed rows and writes them to the store one batch at a time.
struct BatchSink<'a> {
    store: &'a mut dyn OutputStore,
    table: &'a str,
    schema: &'a InferredSchema,
    batch_size: usize,
    cancel: Option<&'a AtomicBool>,
    batch: Vec<Vec<Value>>,
    inserted: usize,
    cancelled: bool,
}

impl BatchSink<'_> {
    /// Queue one row. Returns `false` once the load has been cancelled.
    fn push(&mut self, row: Vec<Value>) -> ImportResult<bool> {
        self.batch.push(row);
        if self.batch.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(!self.cancelled)
    }

    fn flush(&mut self) -> ImportResult<()> {
        if !self.batch.is_empty() {
            self.inserted += self
                .store
                .insert_batch(self.table, self.schema, &self.batch)?;
            self.batch.clear();
        }
        if let Some(cancel) = self.cancel {
            if cancel.load(Ordering::Relaxed) {
                self.cancelled = true;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> ImportResult<usize> {
        if !self.cancelled {
            self.flush()?;
        }
        Ok(self.inserted)
    }
}

/// Coerce one raw record into a typed row: short records are padded with
/// nulls, extra trailing fields are dropped.
fn typed_row<'r>(
    schema: &InferredSchema,
    get: impl Fn(usize) -> Option<&'r str>,
) -> Vec<Value> {
    schema
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| match get(i) {
            Some(raw) => Value::coerce(raw, column.ty),
            None => Value::Null,
        })
        .collect()
}

fn open_source(path: &Path) -> ImportResult<File> {
    File::open(path).map_err(|source| ImportError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

fn stream_delimited(
    path: &Path,
    delimiter: u8,
    schema: &InferredSchema,
    sink: &mut BatchSink<'_>,
) -> ImportResult<()> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(schema.has_header)
        .flexible(true)
        .from_reader(BufReader::new(open_source(path)?));

    for record in reader.records() {
        let record = record?;
        let row = typed_row(schema, |i| record.get(i));
        if !sink.push(row)? {
            break;
        }
    }
    Ok(())
}

fn stream_fixed_width(
    path: &Path,
    bounds: &[(usize, usize)],
    schema: &InferredSchema,
    sink: &mut BatchSink<'_>,
) -> ImportResult<()> {
    let reader = BufReader::new(open_source(path)?);
    let mut skip_header = schema.has_header;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if skip_header {
            skip_header = false;
            continue;
        }
        let fields = split_fixed(&line, bounds);
        let row = typed_row(schema, |i| fields.get(i).map(String::as_str));
        if !sink.push(row)? {
            break;
        }
    }
    Ok(())
}

#[cfg(feature = "excel")]
fn stream_sheet(
    path: &Path,
    schema: &InferredSchema,
    sink: &mut BatchSink<'_>,
) -> ImportResult<()> {
    use calamine::{open_workbook_auto, Data, Reader};

    use crate::inspection::sheet::cell_to_value;

    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::EmptySource {
            path: path.to_path_buf(),
        })?;
    let range = workbook.worksheet_range(&sheet)?;

    for (idx, cells) in range.rows().enumerate() {
        if idx == 0 && schema.has_header {
            continue;
        }
        let row = schema
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| cell_to_value(cells.get(i).unwrap_or(&Data::Empty), column.ty))
            .collect();
        if !sink.push(row)? {
            break;
        }
    }
    Ok(())
}

#[cfg(not(feature = "excel"))]
fn stream_sheet(
    path: &Path,
    _schema: &InferredSchema,
    _sink: &mut BatchSink<'_>,
) -> ImportResult<()> {
    let _ = path;
    Err(ImportError::UnsupportedProvider(
        "spreadsheet sources require the 'excel' feature".to_owned(),
    ))
}
