use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type returned across the import pipeline.
///
/// This is a single error enum shared by inspection, planning, and loading.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The source file could not be opened (missing, locked, corrupt).
    #[error("source unreadable: {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source file contains no data rows.
    #[error("empty source: {path} has no data rows")]
    EmptySource { path: PathBuf },

    /// The requested output provider is not one of the supported store kinds.
    #[error("unsupported provider '{0}'")]
    UnsupportedProvider(String),

    /// The output store could not be created or written.
    #[error("target unwritable: {0}")]
    TargetUnwritable(#[from] rusqlite::Error),

    /// Read failure while streaming delimited records.
    #[error("source read error: {0}")]
    SourceRead(#[from] csv::Error),

    /// Underlying I/O error during the full read pass.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet read error (feature-gated behind `excel`).
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// A cached schema failed to serialize or deserialize.
    #[error("schema cache error: {0}")]
    Cache(#[from] serde_json::Error),

    /// Base configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}
