//! No-op output store.

use crate::error::ImportResult;
use crate::store::OutputStore;
use crate::types::{InferredSchema, Value};

/// Store that accepts everything and writes nothing. Used by callers that
/// only want schema inspection (provider `null`).
#[derive(Debug, Default)]
pub struct NullStore;

impl OutputStore for NullStore {
    fn prepare(&mut self, _table: &str, _schema: &InferredSchema) -> ImportResult<()> {
        Ok(())
    }

    fn insert_batch(
        &mut self,
        _table: &str,
        _schema: &InferredSchema,
        rows: &[Vec<Value>],
    ) -> ImportResult<usize> {
        Ok(rows.len())
    }
}
