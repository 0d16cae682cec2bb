//! Process-wide inspection cache.
//!
//! Maps a [`Fingerprint`] to the serialized [`InferredSchema`] it produced,
//! guaranteeing at most one inspection per fingerprint even under concurrent
//! callers. A plain look-then-insert over a map admits duplicate computation;
//! instead every fingerprint owns a single-initialization cell, and the outer
//! mutex is held only long enough to find or insert that cell.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{ImportError, ImportResult};
use crate::fingerprint::Fingerprint;
use crate::types::InferredSchema;

/// Fingerprint-keyed cache of serialized inspection results.
///
/// Entries are never evicted; they live for the life of the process.
#[derive(Debug, Default)]
pub struct InspectionCache {
    entries: Mutex<HashMap<Fingerprint, Arc<OnceCell<String>>>>,
}

impl InspectionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the schema cached under `fingerprint`, computing and caching it
    /// with `compute` if absent.
    ///
    /// The first caller for a fingerprint runs `compute` exactly once;
    /// concurrent callers for the same fingerprint block until it finishes
    /// and then share the result. A failed `compute` caches nothing, so the
    /// next caller retries.
    pub fn get_or_compute<F>(&self, fingerprint: &Fingerprint, compute: F) -> ImportResult<InferredSchema>
    where
        F: FnOnce() -> ImportResult<InferredSchema>,
    {
        let cell = {
            let mut entries = self
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(fingerprint.clone()).or_default())
        };

        if cell.get().is_some() {
            debug!(%fingerprint, "using cached delimiter, header, type, and string-length inspection");
        }

        let serialized = cell.get_or_try_init(|| {
            let schema = compute()?;
            info!(%fingerprint, columns = schema.columns.len(), "cached delimiter, header, type, and string-length inspection");
            Ok::<_, ImportError>(serde_json::to_string(&schema)?)
        })?;

        Ok(serde_json::from_str(serialized)?)
    }

    /// Number of cached inspections.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    /// Whether the cache holds no completed inspections.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
