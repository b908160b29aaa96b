// src/storage/mod.rs

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

pub mod gcs;
pub mod local;
pub mod registry;

pub use gcs::{GcsBucket, GcsConfig};
pub use local::{LocalBucket, LocalConfig};
pub use registry::{StorageConfig, StorageRegistry};

/// A bucket-like destination that accepts whole files by object name.
#[async_trait]
pub trait StorageTarget: Send + Sync {
    /// Human-readable location, e.g. `gs://bucket/prefix`.
    fn describe(&self) -> String;

    /// Copy the local file at `from` to the object named `to`, replacing any
    /// existing object of that name.
    async fn upload_from_path(&self, from: &Path, to: &str) -> Result<()>;

    /// Whether an object named `key` is present.
    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Joins a configured prefix and an object key with exactly one `/`.
pub(crate) fn prefixed_key(prefix: Option<&str>, key: &str) -> String {
    let key = key.trim_start_matches('/');
    match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(p) => format!("{}/{}", p, key),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::prefixed_key;

    #[test]
    fn test_prefixed_key() {
        assert_eq!(prefixed_key(None, "data/green/a.parquet"), "data/green/a.parquet");
        assert_eq!(prefixed_key(Some(""), "data/a.parquet"), "data/a.parquet");
        assert_eq!(prefixed_key(Some("raw/"), "/data/a.parquet"), "raw/data/a.parquet");
        assert_eq!(prefixed_key(Some("/raw/nyc/"), "data/a.parquet"), "raw/nyc/data/a.parquet");
    }
}
