//! Base configuration resolved before per-request overrides.

use serde::{Deserialize, Serialize};

use crate::error::ImportResult;

/// Resolved base settings an [`crate::ImportRequest`] is applied on top of.
///
/// Mirrors an external configuration file: the output connection defaults
/// plus the inspection sample window. Request overrides win only when
/// explicitly supplied (see [`crate::plan`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseConfig {
    /// Default output provider (one of the supported store kinds).
    pub provider: String,
    /// Default server host. Unused by file-backed providers.
    pub server: String,
    /// Default database name (for sqlite, the database file path).
    pub database: String,
    /// Default user name.
    pub user: String,
    /// Default password.
    pub password: String,
    /// Default port. `0` means the provider's own default.
    pub port: u16,
    /// Number of leading lines sampled during inspection.
    pub sample_size: usize,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            provider: "sqlite".to_owned(),
            server: String::new(),
            database: "flatbed.db".to_owned(),
            user: String::new(),
            password: String::new(),
            port: 0,
            sample_size: 100,
        }
    }
}

impl BaseConfig {
    /// Parse a configuration from a TOML document. Missing keys fall back to
    /// their defaults.
    pub fn from_toml_str(s: &str) -> ImportResult<Self> {
        Ok(toml::from_str(s)?)
    }
}
