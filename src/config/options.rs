use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{
    ARTIFACTS_FILTER_FILE_KEY, DEFAULT_RECURSIVE_GLOB_LIMIT, SUPPORTED_REGISTRY_HIVES,
};

/// Tunables for one compilation pass.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Depth variants produced for a `**` marker without an explicit count
    #[serde(default = "default_recursive_glob_limit")]
    pub recursive_glob_limit: usize,

    /// Registry root hives that survive the compatibility filter
    #[serde(default = "default_supported_hives")]
    pub supported_hives: Vec<String>,

    /// Emit a warning for every key dropped by the hive filter
    #[serde(default)]
    pub log_dropped_hives: bool,

    /// Knowledge store key the compiled collection is published under
    #[serde(default = "default_store_key")]
    pub store_key: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            recursive_glob_limit: default_recursive_glob_limit(),
            supported_hives: default_supported_hives(),
            log_dropped_hives: false,
            store_key: default_store_key(),
        }
    }
}

fn default_recursive_glob_limit() -> usize {
    DEFAULT_RECURSIVE_GLOB_LIMIT
}

fn default_supported_hives() -> Vec<String> {
    SUPPORTED_REGISTRY_HIVES.iter().map(|hive| hive.to_string()).collect()
}

fn default_store_key() -> String {
    ARTIFACTS_FILTER_FILE_KEY.to_string()
}

impl CompilerOptions {
    /// Load options from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read options file: {}", path.display()))?;

        let options: CompilerOptions =
            serde_yaml::from_str(&content).context("Failed to parse YAML options")?;

        debug!("Loaded compiler options from {}", path.display());
        Ok(options)
    }

    /// Save options to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize options to YAML")?;

        fs::write(path, yaml)
            .context(format!("Failed to write options to {}", path.display()))?;

        info!("Saved compiler options to {}", path.display());
        Ok(())
    }

    /// Load options from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => Ok(Self::default()),
        }
    }
}
