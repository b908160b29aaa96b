// src/storage/gcs.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use google_cloud_storage::{
    client::{google_cloud_auth::credentials::CredentialsFile, Client, ClientConfig},
    http::{
        objects::{
            get::GetObjectRequest,
            upload::{Media, UploadObjectRequest, UploadType},
        },
        Error as GcsError,
    },
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::{prefixed_key, StorageTarget};

/// Connection details for a Google Cloud Storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GcsConfig {
    pub bucket: String,
    /// Optional folder inside the bucket.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Service-account key file. When absent, Application Default
    /// Credentials are used (`GOOGLE_APPLICATION_CREDENTIALS`, gcloud login,
    /// metadata server).
    #[serde(default)]
    pub credentials: Option<PathBuf>,
}

pub struct GcsBucket {
    client: Client,
    bucket: String,
    prefix: Option<String>,
}

impl GcsBucket {
    /// Authenticate and build a client for `cfg.bucket`.
    pub async fn connect(cfg: &GcsConfig) -> Result<Self> {
        let client_cfg = match &cfg.credentials {
            Some(path) => {
                let creds = CredentialsFile::new_from_file(path.to_string_lossy().into_owned())
                    .await
                    .with_context(|| format!("loading GCS credentials from {}", path.display()))?;
                ClientConfig::default()
                    .with_credentials(creds)
                    .await
                    .context("authenticating to GCS with key file")?
            }
            None => ClientConfig::default()
                .with_auth()
                .await
                .context("authenticating to GCS")?,
        };
        info!(bucket = %cfg.bucket, prefix = ?cfg.prefix, "GCS client ready");

        Ok(Self {
            client: Client::new(client_cfg),
            bucket: cfg.bucket.clone(),
            prefix: cfg.prefix.clone(),
        })
    }

    fn object_name(&self, key: &str) -> String {
        prefixed_key(self.prefix.as_deref(), key)
    }
}

#[async_trait]
impl StorageTarget for GcsBucket {
    fn describe(&self) -> String {
        match &self.prefix {
            Some(p) => format!("gs://{}/{}", self.bucket, p.trim_matches('/')),
            None => format!("gs://{}", self.bucket),
        }
    }

    async fn upload_from_path(&self, from: &Path, to: &str) -> Result<()> {
        let object_name = self.object_name(to);
        let data = fs::read(from)
            .await
            .with_context(|| format!("reading {}", from.display()))?;
        let len = data.len() as u64;

        let mut media = Media::new(object_name.clone());
        media.content_length = Some(len);
        let upload_req = UploadObjectRequest {
            bucket: self.bucket.clone(),
            ..Default::default()
        };

        self.client
            .upload_object(&upload_req, data, &UploadType::Simple(media))
            .await
            .with_context(|| format!("uploading {} to gs://{}", object_name, self.bucket))?;

        debug!(object = %object_name, bytes = len, "uploaded to GCS");
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let req = GetObjectRequest {
            bucket: self.bucket.clone(),
            object: self.object_name(key),
            ..Default::default()
        };
        match self.client.get_object(&req).await {
            Ok(_) => Ok(true),
            Err(GcsError::Response(e)) if e.code == 404 => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("looking up gs://{}/{}", self.bucket, req.object)),
        }
    }
}
