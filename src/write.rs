// src/write.rs

use anyhow::{Context, Result};
use parquet::{
    arrow::ArrowWriter,
    basic::{Compression, GzipLevel},
    file::properties::WriterProperties,
};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

use crate::dataset::Dataset;

/// Local directory every category folder is created under.
pub const DATA_DIR: &str = "data";
pub const PARQUET_EXT: &str = "parquet";

/// A parquet file written by [`LocalWriter`].
///
/// `relative` is the path replicated in the bucket; `base` is where it is
/// anchored on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    base: PathBuf,
    relative: PathBuf,
}

impl LocalArtifact {
    pub fn new(base: impl Into<PathBuf>, relative: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            relative: relative.into(),
        }
    }

    /// Location on local disk.
    pub fn path(&self) -> PathBuf {
        self.base.join(&self.relative)
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// The relative path with `/` separators, as used for object names.
    pub fn object_key(&self) -> String {
        self.relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn size_bytes(&self) -> Result<u64> {
        let path = self.path();
        Ok(fs::metadata(&path)
            .with_context(|| format!("stat {}", path.display()))?
            .len())
    }
}

/// Serialises datasets to gzip-compressed parquet under `<base>/data/<color>/`.
#[derive(Debug, Clone)]
pub struct LocalWriter {
    base: PathBuf,
}

impl LocalWriter {
    /// `base` is normally the working directory (`"."`).
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Write `dataset` to `data/<color>/<stem>.parquet` and return where it landed.
    ///
    /// The directory is created if missing; an existing file is replaced.
    #[instrument(level = "info", skip(self, dataset), fields(rows = dataset.num_rows()))]
    pub fn write(&self, dataset: Dataset, color: &str, stem: &str) -> Result<LocalArtifact> {
        let rel_dir = Path::new(DATA_DIR).join(color);
        let dir = self.base.join(&rel_dir);
        fs::create_dir_all(&dir).with_context(|| format!("creating {:?}", dir))?;

        let artifact = LocalArtifact::new(
            self.base.clone(),
            rel_dir.join(format!("{}.{}", stem, PARQUET_EXT)),
        );
        let out_path = artifact.path();
        let temp_path = out_path.with_extension("tmp");
        info!(path = %out_path.display(), "writing parquet");

        write_parquet(dataset, &temp_path)?;

        // only a complete file is ever visible at the final path
        fs::rename(&temp_path, &out_path).with_context(|| {
            format!(
                "renaming {} -> {}",
                temp_path.display(),
                out_path.display()
            )
        })?;

        let bytes = artifact.size_bytes()?;
        info!(path = %out_path.display(), bytes, "wrote parquet");
        Ok(artifact)
    }
}

fn write_parquet(dataset: Dataset, path: &Path) -> Result<()> {
    let props = WriterProperties::builder()
        .set_compression(Compression::GZIP(GzipLevel::default()))
        .build();

    let (schema, batches) = dataset.into_parts();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))
        .with_context(|| format!("opening parquet writer for {}", path.display()))?;

    for (idx, batch) in batches.iter().enumerate() {
        debug!(batch = idx, rows = batch.num_rows(), "writing batch");
        writer
            .write(batch)
            .with_context(|| format!("writing batch {} to {}", idx, path.display()))?;
    }
    writer
        .close()
        .with_context(|| format!("closing parquet writer for {}", path.display()))?;
    Ok(())
}
