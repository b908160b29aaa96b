// src/fetch/csv.rs

use anyhow::{bail, Context, Result};
use arrow::csv::{reader::Format, ReaderBuilder};
use flate2::read::MultiGzDecoder;
use std::{
    io::{Cursor, Read},
    sync::Arc,
};
use tracing::debug;

use crate::dataset::Dataset;

const BATCH_SIZE: usize = 64 * 1024;

/// Inflate a gzip body. Concatenated members are read as one stream.
pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len() * 4);
    MultiGzDecoder::new(bytes)
        .read_to_end(&mut out)
        .context("decompressing gzip body")?;
    Ok(out)
}

/// Parse a headed CSV blob into a [`Dataset`].
///
/// Column types are inferred from every row; nothing is validated beyond
/// the CSV itself being well formed.
pub fn parse_csv(data: &[u8]) -> Result<Dataset> {
    if data.iter().all(u8::is_ascii_whitespace) {
        bail!("CSV body is empty");
    }

    let format = Format::default().with_header(true);
    let (schema, records) = format
        .infer_schema(Cursor::new(data), None)
        .context("inferring CSV schema")?;
    if schema.fields().is_empty() {
        bail!("CSV has no header row");
    }
    debug!(columns = schema.fields().len(), records, "inferred schema");

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(Cursor::new(data))
        .context("creating CSV reader")?;

    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .context("reading CSV records")?;

    Ok(Dataset::new(schema, batches))
}
