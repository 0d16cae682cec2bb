//! The output store capability: create the target table from a schema,
//! accept bulk inserts of typed rows, and report how many landed.
//!
//! One implementation per supported backend, selected by the plan's
//! [`Provider`] tag.

mod null;
mod sqlite;

pub use null::NullStore;
pub use sqlite::SqliteStore;

use crate::error::ImportResult;
use crate::plan::{OutputDescriptor, Provider};
use crate::types::{InferredSchema, Value};

/// A relational target capable of holding one imported entity.
pub trait OutputStore {
    /// Create the target table from the schema if it does not already exist,
    /// then clear any prior rows: every import is a full load.
    fn prepare(&mut self, table: &str, schema: &InferredSchema) -> ImportResult<()>;

    /// Insert a batch of typed rows, returning how many were written.
    fn insert_batch(
        &mut self,
        table: &str,
        schema: &InferredSchema,
        rows: &[Vec<Value>],
    ) -> ImportResult<usize>;
}

/// Open the store `output` describes. The connection lives for one load and
/// is released when the returned store is dropped, on every exit path.
pub fn open(output: &OutputDescriptor) -> ImportResult<Box<dyn OutputStore>> {
    match output.provider {
        Provider::Sqlite => Ok(Box::new(SqliteStore::open(&output.database)?)),
        Provider::Null => Ok(Box::new(NullStore::default())),
    }
}
