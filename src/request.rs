//! Import requests.

use std::path::{Path, PathBuf};

use crate::types::ColumnType;

/// A single import request: the source file plus optional overrides applied
/// on top of the [`crate::BaseConfig`]. Immutable once constructed; build it
/// with [`ImportRequest::new`] and the `with_*` setters.
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    /// Path to the source file.
    pub file: PathBuf,
    /// Output provider override.
    pub provider: Option<String>,
    /// Output server override.
    pub server: Option<String>,
    /// Output database override (for sqlite, the database file path).
    pub database: Option<String>,
    /// Output user override.
    pub user: Option<String>,
    /// Output password override.
    pub password: Option<String>,
    /// Output port override.
    pub port: Option<u16>,
    /// Explicit target table/view name. Defaults to the source file's base
    /// name, normalized to an identifier.
    pub table: Option<String>,
    /// Explicit column types, applied positionally over the inferred columns.
    pub types: Vec<ColumnType>,
}

impl ImportRequest {
    /// Create a request for `file` with no overrides.
    pub fn new(file: impl AsRef<Path>) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Override the output provider.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Override the output server.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Override the output database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Override the output credentials.
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Override the output port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Name the target table/view explicitly.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Force column types positionally, taking precedence over inference.
    pub fn with_types(mut self, types: Vec<ColumnType>) -> Self {
        self.types = types;
        self
    }
}
