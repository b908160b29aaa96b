pub mod config;
pub mod dataset;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod retry;
pub mod storage;
pub mod upload;
pub mod write;

#[cfg(test)]
pub(crate) mod test_support;

pub use dataset::{Dataset, DatasetId};
pub use pipeline::{Pipeline, RunSummary, Stage};
