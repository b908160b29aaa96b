// src/config.rs

use std::{env, path::PathBuf};

/// Env var pointing at the storage registry YAML.
pub const STORAGE_CONFIG_ENV: &str = "ETL_STORAGE_CONFIG";
/// Env var selecting which registry entry to upload to.
pub const STORAGE_TARGET_ENV: &str = "ETL_STORAGE_TARGET";

pub const DEFAULT_STORAGE_CONFIG: &str = "storage.yaml";
pub const DEFAULT_STORAGE_TARGET: &str = "zoomcamp-gcs";

/// Where the run finds its storage target. Everything else is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub storage_config: PathBuf,
    pub storage_target: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_config: PathBuf::from(DEFAULT_STORAGE_CONFIG),
            storage_target: DEFAULT_STORAGE_TARGET.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key/value source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            storage_config: get(STORAGE_CONFIG_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_config),
            storage_target: get(STORAGE_TARGET_ENV).unwrap_or(defaults.storage_target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let s = Settings::from_lookup(|_| None);
        assert_eq!(s, Settings::default());
        assert_eq!(s.storage_target, "zoomcamp-gcs");
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let vars: HashMap<&str, &str> = [
            (STORAGE_CONFIG_ENV, "/etc/etl/storage.yaml"),
            (STORAGE_TARGET_ENV, "  "),
        ]
        .into_iter()
        .collect();
        let s = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(s.storage_config, PathBuf::from("/etc/etl/storage.yaml"));
        assert_eq!(s.storage_target, DEFAULT_STORAGE_TARGET);
    }
}
