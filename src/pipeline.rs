// src/pipeline.rs

use anyhow::{Context, Result};
use std::{fmt, path::PathBuf, time::Instant};
use tracing::{info, instrument};

use crate::dataset::{DatasetId, DEFAULT_RELEASE_BASE};
use crate::fetch::Fetcher;
use crate::upload::Uploader;
use crate::write::LocalWriter;

/// Steps of a run, in the only order they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    WriteLocal,
    Upload,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Fetch => "fetch",
            Stage::WriteLocal => "write_local",
            Stage::Upload => "upload",
            Stage::Done => "done",
        };
        f.write_str(s)
    }
}

impl Stage {
    fn failed(self) -> String {
        format!("{} step failed", self)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub dataset: DatasetId,
    pub rows: usize,
    pub columns: usize,
    pub local_path: PathBuf,
    pub object_key: String,
    pub bytes: u64,
}

/// Fetch → write local parquet → upload, strictly one after another.
/// The first failing step aborts the run; nothing is cleaned up.
pub struct Pipeline {
    fetcher: Fetcher,
    writer: LocalWriter,
    uploader: Uploader,
    source_base: String,
}

impl Pipeline {
    pub fn new(fetcher: Fetcher, writer: LocalWriter, uploader: Uploader) -> Self {
        Self {
            fetcher,
            writer,
            uploader,
            source_base: DEFAULT_RELEASE_BASE.to_string(),
        }
    }

    /// Pull datasets from a mirror of the release host instead.
    pub fn with_source_base(mut self, base: impl Into<String>) -> Self {
        self.source_base = base.into();
        self
    }

    #[instrument(level = "info", skip(self), fields(dataset = %id))]
    pub async fn run(&self, id: &DatasetId) -> Result<RunSummary> {
        let start = Instant::now();
        let stem = id.file_stem();
        let url = id.url_with_base(&self.source_base);

        info!(stage = %Stage::Fetch, %url, "starting");
        let dataset = self
            .fetcher
            .fetch(&url)
            .await
            .context(Stage::Fetch.failed())?;
        let (rows, columns) = (dataset.num_rows(), dataset.num_columns());

        info!(stage = %Stage::WriteLocal, rows, columns, "starting");
        let artifact = {
            let writer = self.writer.clone();
            let color = id.color.clone();
            tokio::task::spawn_blocking(move || writer.write(dataset, &color, &stem))
                .await
                .context("parquet write task panicked")?
                .context(Stage::WriteLocal.failed())?
        };

        info!(stage = %Stage::Upload, file = %artifact.path().display(), "starting");
        let object_key = self
            .uploader
            .upload(&artifact)
            .await
            .context(Stage::Upload.failed())?;

        let bytes = artifact.size_bytes()?;
        info!(
            stage = %Stage::Done,
            rows,
            bytes,
            object = %object_key,
            elapsed = ?start.elapsed(),
            "run complete"
        );

        Ok(RunSummary {
            dataset: id.clone(),
            rows,
            columns,
            local_path: artifact.path(),
            object_key,
            bytes,
        })
    }
}
