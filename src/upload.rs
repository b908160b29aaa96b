// src/upload.rs

use anyhow::{bail, Context, Result};
use std::time::Instant;
use tracing::{info, instrument};

use crate::storage::StorageTarget;
use crate::write::LocalArtifact;

/// Pushes local artifacts to a storage target under their relative path.
pub struct Uploader {
    target: Box<dyn StorageTarget>,
}

impl Uploader {
    pub fn new(target: Box<dyn StorageTarget>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &dyn StorageTarget {
        self.target.as_ref()
    }

    /// Upload `artifact` to the same relative path in the target and confirm
    /// the object is visible afterwards. Single attempt.
    #[instrument(level = "info", skip(self, artifact), fields(file = %artifact.path().display()))]
    pub async fn upload(&self, artifact: &LocalArtifact) -> Result<String> {
        let path = artifact.path();
        if !path.is_file() {
            bail!("local file {} does not exist", path.display());
        }

        let key = artifact.object_key();
        let dest = self.target.describe();
        let start = Instant::now();
        info!(object = %key, target = %dest, "uploading");

        self.target
            .upload_from_path(&path, &key)
            .await
            .with_context(|| format!("uploading {} to {}", path.display(), dest))?;

        if !self.target.exists(&key).await? {
            bail!("object {} not found in {} after upload", key, dest);
        }

        info!(object = %key, target = %dest, elapsed = ?start.elapsed(), "uploaded");
        Ok(key)
    }
}
