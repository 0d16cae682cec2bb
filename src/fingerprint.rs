//! Deterministic cache keys for import requests.

use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::config::BaseConfig;
use crate::request::ImportRequest;

/// Opaque deterministic cache key derived from a request's identity-relevant
/// fields. Equal for two requests naming the same file and the same
/// typing-relevant overrides; never equal for different files or different
/// type overrides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint for `request` resolved against `config`.
///
/// The digest covers the absolute source path, the effective output provider,
/// the explicit type overrides, and the sample window size: everything that
/// can change what the inspector produces. Overrides that only move the
/// output (server, database, credentials, port, table name) are deliberately
/// excluded: requests differing only in destination share one cached
/// inspection.
pub fn fingerprint(request: &ImportRequest, config: &BaseConfig) -> Fingerprint {
    let path = absolute_path(&request.file);
    let provider = request
        .provider
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or(&config.provider);

    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hasher.update([0x1f]);
    hasher.update(provider.as_bytes());
    hasher.update([0x1f]);
    for ty in &request.types {
        hasher.update(ty.name().as_bytes());
        hasher.update([0x1e]);
    }
    hasher.update([0x1f]);
    hasher.update(config.sample_size.to_le_bytes());

    Fingerprint(hex::encode(hasher.finalize()))
}

/// Stable source identifier: the absolute form of the path. Resolution does
/// not require the file to exist (the inspector reports that separately).
fn absolute_path(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;

    #[test]
    fn same_request_same_key() {
        let cfg = BaseConfig::default();
        let a = ImportRequest::new("data/sample.csv");
        let b = ImportRequest::new("data/sample.csv");
        assert_eq!(fingerprint(&a, &cfg), fingerprint(&b, &cfg));
    }

    #[test]
    fn different_files_never_collide() {
        let cfg = BaseConfig::default();
        let a = ImportRequest::new("a.csv");
        let b = ImportRequest::new("b.csv");
        assert_ne!(fingerprint(&a, &cfg), fingerprint(&b, &cfg));
    }

    #[test]
    fn type_overrides_change_the_key() {
        let cfg = BaseConfig::default();
        let a = ImportRequest::new("a.csv");
        let b = ImportRequest::new("a.csv").with_types(vec![ColumnType::String]);
        assert_ne!(fingerprint(&a, &cfg), fingerprint(&b, &cfg));
    }

    #[test]
    fn destination_overrides_share_the_key() {
        let cfg = BaseConfig::default();
        let a = ImportRequest::new("a.csv")
            .with_server("one")
            .with_database("x.db");
        let b = ImportRequest::new("a.csv")
            .with_server("two")
            .with_database("y.db")
            .with_table("elsewhere");
        assert_eq!(fingerprint(&a, &cfg), fingerprint(&b, &cfg));
    }
}
