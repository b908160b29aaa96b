// src/storage/registry.rs

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};
use tracing::info;

use super::{GcsBucket, GcsConfig, LocalBucket, LocalConfig, StorageTarget};

/// One storage target as written in the registry file.
///
/// ```yaml
/// zoomcamp-gcs:
///   kind: gcs
///   bucket: dtc_data_lake_example
///   credentials: /secrets/sa.json
/// scratch:
///   kind: local
///   root: /tmp/lake
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    Gcs(GcsConfig),
    Local(LocalConfig),
}

impl StorageConfig {
    /// Build the live target. For GCS this authenticates.
    pub async fn connect(&self) -> Result<Box<dyn StorageTarget>> {
        let target: Box<dyn StorageTarget> = match self {
            StorageConfig::Gcs(cfg) => Box::new(GcsBucket::connect(cfg).await?),
            StorageConfig::Local(cfg) => Box::new(LocalBucket::from_config(cfg)),
        };
        Ok(target)
    }
}

/// Named storage targets loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct StorageRegistry {
    targets: BTreeMap<String, StorageConfig>,
}

impl StorageRegistry {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).context("parsing storage registry YAML")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading storage registry {}", path.display()))?;
        let registry = Self::from_yaml_str(&text)
            .with_context(|| format!("loading storage registry {}", path.display()))?;
        info!(
            path = %path.display(),
            targets = registry.targets.len(),
            "loaded storage registry"
        );
        Ok(registry)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Look up `name`; unknown names are an error listing what is configured.
    pub fn resolve(&self, name: &str) -> Result<&StorageConfig> {
        self.targets.get(name).ok_or_else(|| {
            anyhow!(
                "unknown storage target {:?} (configured: {})",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            )
        })
    }
}
