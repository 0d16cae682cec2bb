//! Import orchestration.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::InspectionCache;
use crate::config::BaseConfig;
use crate::error::ImportResult;
use crate::fingerprint::fingerprint;
use crate::inspection::inspect;
use crate::load::{self, LoadOptions, LoadResult};
use crate::plan;
use crate::request::ImportRequest;

/// Ties the pipeline together: fingerprint → cache lookup (inspection on
/// miss) → plan → load.
///
/// The inspection cache is shared across requests (and can be shared across
/// importers via [`Importer::with_cache`]), so repeated imports of the same
/// logical source skip the sampling pass while still executing a full load.
#[derive(Debug)]
pub struct Importer {
    config: BaseConfig,
    cache: Arc<InspectionCache>,
    load_options: LoadOptions,
}

impl Importer {
    /// Create an importer with its own cache.
    pub fn new(config: BaseConfig) -> Self {
        Self::with_cache(config, Arc::new(InspectionCache::new()))
    }

    /// Create an importer sharing an existing cache.
    pub fn with_cache(config: BaseConfig, cache: Arc<InspectionCache>) -> Self {
        Self {
            config,
            cache,
            load_options: LoadOptions::default(),
        }
    }

    /// Replace the load options (batch size, cancellation signal).
    pub fn with_load_options(mut self, load_options: LoadOptions) -> Self {
        self.load_options = load_options;
        self
    }

    /// The shared inspection cache.
    pub fn cache(&self) -> &Arc<InspectionCache> {
        &self.cache
    }

    /// Run one import.
    ///
    /// Inspection and planning errors propagate: an unreadable or empty
    /// source and an unsupported provider all surface before any target I/O.
    /// A failure during the load step itself is logged and converted into a
    /// zero-valued [`LoadResult`] carrying the resolved view name, keeping
    /// the caller-facing contract simple; callers needing failure detail
    /// should watch the executor's error reporting (or a zero row count).
    pub fn import(&self, request: &ImportRequest) -> ImportResult<LoadResult> {
        let key = fingerprint(request, &self.config);
        let schema = self.cache.get_or_compute(&key, || {
            inspect(&request.file, &request.types, self.config.sample_size)
        })?;

        let plan = plan::build(request, &self.config, schema)?;
        debug!(
            file = %plan.input.path.display(),
            table = %plan.output.table,
            columns = plan.schema.columns.len(),
            "executing load plan"
        );

        match load::execute(&plan, &self.load_options) {
            Ok(result) => {
                info!(records = result.records, view = %result.view, "import complete");
                Ok(result)
            }
            Err(error) => {
                warn!(%error, view = %plan.output.table, "load failed; returning zero-valued result");
                Ok(LoadResult::zero(plan.output.table))
            }
        }
    }
}
