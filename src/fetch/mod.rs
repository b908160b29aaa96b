// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use url::Url;

use crate::dataset::Dataset;
use crate::retry::{retry_fixed, RetryPolicy};

pub mod csv;

pub use self::csv::{gunzip, parse_csv};

/// Knobs for the HTTP side of the fetch step.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub retry: RetryPolicy,
    /// Whole-request timeout; `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Downloads a remote CSV (optionally `.gz`) and materialises it in memory.
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("building HTTP client")?;
        Ok(Self::with_client(client, config.retry))
    }

    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Fetch and parse `url`, re-running the whole download on any failure
    /// until the retry budget is spent.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Dataset> {
        let start = Instant::now();
        info!("fetching dataset");

        let what = format!("fetching {}", url);
        let ds = retry_fixed(&self.retry, &what, |attempt| {
            debug!(attempt, "fetch attempt");
            fetch_once(&self.client, url)
        })
        .await?;

        info!(
            rows = ds.num_rows(),
            columns = ds.num_columns(),
            elapsed = ?start.elapsed(),
            "fetched dataset"
        );
        Ok(ds)
    }
}

async fn fetch_once(client: &Client, url: &str) -> Result<Dataset> {
    let url = Url::parse(url).with_context(|| format!("parsing URL {}", url))?;
    let bytes = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .bytes()
        .await
        .with_context(|| format!("Reading body from {}", url))?;
    debug!(%url, bytes = bytes.len(), "downloaded body");

    let gzipped = url.path().ends_with(".gz");

    // decompression and type inference are CPU bound
    tokio::task::spawn_blocking(move || {
        let raw = if gzipped {
            gunzip(&bytes)?
        } else {
            bytes.to_vec()
        };
        parse_csv(&raw)
    })
    .await
    .context("CSV parse task panicked")?
    .with_context(|| format!("parsing CSV from {}", url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gzip, unreachable_base_url, StubServer, SAMPLE_CSV};

    fn fetcher() -> Fetcher {
        Fetcher::new(FetchConfig {
            retry: RetryPolicy::default(),
            timeout: Some(Duration::from_secs(10)),
        })
        .expect("client builds")
    }

    #[tokio::test]
    async fn test_fetch_gzip_csv() -> Result<()> {
        let server = StubServer::start(200, gzip(SAMPLE_CSV.as_bytes())).await;
        let url = format!("{}/green/green_tripdata_2020-01.csv.gz", server.base_url());

        let ds = fetcher().fetch(&url).await?;
        assert_eq!(ds.num_rows(), 4);
        assert_eq!(ds.num_columns(), 7);
        assert_eq!(server.hits(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_plain_csv() -> Result<()> {
        let server = StubServer::start(200, SAMPLE_CSV.as_bytes().to_vec()).await;
        let url = format!("{}/green/sample.csv", server.base_url());

        let ds = fetcher().fetch(&url).await?;
        assert_eq!(ds.num_rows(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_tried_exactly_three_times() {
        let server = StubServer::start(500, Vec::new()).await;
        let url = format!("{}/green/green_tripdata_2020-01.csv.gz", server.base_url());

        let err = fetcher().fetch(&url).await.unwrap_err();
        assert_eq!(server.hits(), 3);
        assert!(format!("{:#}", err).contains("after 3 attempts"));
    }

    #[tokio::test]
    async fn test_unreachable_url_fails_after_three_attempts() {
        let url = format!(
            "{}/green/green_tripdata_2020-01.csv.gz",
            unreachable_base_url().await
        );

        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(format!("{:#}", err).contains("after 3 attempts"));
    }

    #[tokio::test]
    async fn test_corrupt_gzip_is_retried_then_fatal() {
        let server = StubServer::start(200, b"not gzip at all".to_vec()).await;
        let url = format!("{}/green/broken.csv.gz", server.base_url());

        let err = fetcher().fetch(&url).await.unwrap_err();
        assert_eq!(server.hits(), 3);
        assert!(format!("{:#}", err).contains("decompressing gzip body"));
    }
}
