//! Load plans: the fully-resolved description of one load.
//!
//! [`build`] combines the (cached or freshly inferred) schema with the
//! request's output overrides into a [`LoadPlan`]: source descriptor, target
//! descriptor, and the typed field list. Plans are built fresh per request
//! and never cached; only the schema is.

use std::path::PathBuf;

use crate::config::BaseConfig;
use crate::error::{ImportError, ImportResult};
use crate::inspection::SourceKind;
use crate::request::ImportRequest;
use crate::types::InferredSchema;

/// Supported output store kinds, selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// SQLite database file.
    Sqlite,
    /// Explicit no-op store for callers that only want schema inspection.
    Null,
}

impl Provider {
    /// Parse a provider name from the supported set, case-insensitively.
    /// Anything else fails with [`ImportError::UnsupportedProvider`] before
    /// any I/O against the target.
    pub fn parse(name: &str) -> ImportResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "null" => Ok(Self::Null),
            other => Err(ImportError::UnsupportedProvider(other.to_owned())),
        }
    }
}

/// Where rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    /// Source file path.
    pub path: PathBuf,
    /// Provider kind implied by the inferred layout.
    pub kind: SourceKind,
}

/// Where rows go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDescriptor {
    /// Output store kind.
    pub provider: Provider,
    /// Server host (unused by file-backed providers).
    pub server: String,
    /// Database name (for sqlite, the database file path).
    pub database: String,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Port; `0` means the provider's default.
    pub port: u16,
    /// Resolved target table/view name.
    pub table: String,
}

/// The fully-resolved description of one load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadPlan {
    /// Source descriptor.
    pub input: InputDescriptor,
    /// Inferred (or override-adjusted) schema.
    pub schema: InferredSchema,
    /// Target descriptor.
    pub output: OutputDescriptor,
}

/// Build a plan by applying `request` overrides onto the base output
/// descriptor. Overrides apply only when explicitly supplied and non-empty;
/// the table/view name defaults to the source file's base name normalized to
/// a valid identifier.
pub fn build(
    request: &ImportRequest,
    config: &BaseConfig,
    schema: InferredSchema,
) -> ImportResult<LoadPlan> {
    let provider_name = pick(&request.provider, &config.provider);
    let provider = Provider::parse(&provider_name)?;

    let table = request
        .table
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| identifier_from_path(&request.file));

    let output = OutputDescriptor {
        provider,
        server: pick(&request.server, &config.server),
        database: pick(&request.database, &config.database),
        user: pick(&request.user, &config.user),
        password: pick(&request.password, &config.password),
        port: request.port.filter(|p| *p != 0).unwrap_or(config.port),
        table,
    };

    Ok(LoadPlan {
        input: InputDescriptor {
            path: request.file.clone(),
            kind: SourceKind::from_layout(&schema.layout),
        },
        schema,
        output,
    })
}

fn pick(override_value: &Option<String>, base: &str) -> String {
    override_value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(base)
        .to_owned()
}

/// Normalize a source file's base name into a valid lowercase identifier:
/// non-alphanumeric characters become underscores and a leading digit is
/// prefixed.
pub fn identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() {
        out.push('_');
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn identifier_from_path(path: &std::path::Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    identifier(&stem)
}
