//! `flatbed` imports tabular flat files of unknown structure (delimited
//! text, fixed-width text, or spreadsheets) into a relational target,
//! inferring the file's shape automatically.
//!
//! One inspection pass over a bounded sample discovers the delimiter (or
//! fixed-width layout), header presence, column names, per-column types
//! (string/integer/decimal/date/boolean), and per-column maximum string
//! lengths. The result is cached per request fingerprint, so re-importing
//! the same logical source skips the sampling pass while still executing a
//! full extract-transform-load every time.
//!
//! ```no_run
//! use flatbed::{BaseConfig, Importer, ImportRequest};
//!
//! # fn main() -> Result<(), flatbed::ImportError> {
//! let importer = Importer::new(BaseConfig {
//!     database: "companies.db".to_owned(),
//!     ..BaseConfig::default()
//! });
//!
//! // No schema given: delimiter, headers, types, and lengths are inferred.
//! let result = importer.import(&ImportRequest::new("companies.csv"))?;
//! println!("loaded {} rows into {}", result.records, result.view);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`inspection`]: the sampling pass that infers a file's structure
//! - [`cache`]: fingerprint-keyed, once-per-fingerprint inspection cache
//! - [`plan`]: combines schema + request overrides into a load plan
//! - [`load`]: the full streaming read/coerce/write pass
//! - [`store`]: output store capability (sqlite, null)
//! - [`importer`]: the orchestrator

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod importer;
pub mod inspection;
pub mod load;
pub mod plan;
pub mod request;
pub mod store;
pub mod types;

pub use cache::InspectionCache;
pub use config::BaseConfig;
pub use error::{ImportError, ImportResult};
pub use fingerprint::{fingerprint, Fingerprint};
pub use importer::Importer;
pub use inspection::{inspect, SourceKind};
pub use load::{EntityLoad, LoadOptions, LoadResult};
pub use plan::{LoadPlan, Provider};
pub use request::ImportRequest;
pub use types::{ColumnDescriptor, ColumnType, InferredSchema, TextLayout, Value};
