// src/storage/local.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::{prefixed_key, StorageTarget};

/// A directory standing in for a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalConfig {
    pub root: PathBuf,
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Objects are plain files at `<root>/<prefix>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalBucket {
    root: PathBuf,
    prefix: Option<String>,
}

impl LocalBucket {
    pub fn new(root: impl Into<PathBuf>, prefix: Option<String>) -> Self {
        Self {
            root: root.into(),
            prefix,
        }
    }

    pub fn from_config(cfg: &LocalConfig) -> Self {
        Self::new(cfg.root.clone(), cfg.prefix.clone())
    }

    /// Where object `key` lives on disk.
    pub fn object_path(&self, key: &str) -> PathBuf {
        let name = prefixed_key(self.prefix.as_deref(), key);
        name.split('/')
            .filter(|seg| !seg.is_empty())
            .fold(self.root.clone(), |p, seg| p.join(seg))
    }
}

#[async_trait]
impl StorageTarget for LocalBucket {
    fn describe(&self) -> String {
        match &self.prefix {
            Some(p) => format!("file://{}/{}", self.root.display(), p.trim_matches('/')),
            None => format!("file://{}", self.root.display()),
        }
    }

    async fn upload_from_path(&self, from: &Path, to: &str) -> Result<()> {
        let dest = self.object_path(to);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let bytes = fs::copy(from, &dest)
            .await
            .with_context(|| format!("copying {} -> {}", from.display(), dest.display()))?;
        debug!(object = %dest.display(), bytes, "copied into local bucket");
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.object_path(key);
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("stat {}", path.display())),
        }
    }
}
