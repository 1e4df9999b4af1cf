//! Knowledge stores receiving compiled find specifications.
//!
//! The compiler never keeps shared state between passes. A caller injects
//! a [`KnowledgeStore`] and the compiled collection is written to it once,
//! replacing whatever an earlier pass stored under the same key.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::models::FindSpecCollection;

/// Key-value store shared with later processing stages.
#[cfg_attr(test, mockall::automock)]
pub trait KnowledgeStore {
    /// Store `find_specs` under `key`, replacing any previous value.
    fn set_find_specs(&mut self, key: &str, find_specs: FindSpecCollection) -> Result<()>;

    fn get_find_specs(&self, key: &str) -> Option<FindSpecCollection>;
}

/// In-memory knowledge store.
#[derive(Debug, Default, Clone)]
pub struct KnowledgeBase {
    values: HashMap<String, FindSpecCollection>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KnowledgeStore for KnowledgeBase {
    fn set_find_specs(&mut self, key: &str, find_specs: FindSpecCollection) -> Result<()> {
        self.values.insert(key.to_string(), find_specs);
        Ok(())
    }

    fn get_find_specs(&self, key: &str) -> Option<FindSpecCollection> {
        self.values.get(key).cloned()
    }
}

/// Knowledge store persisted as a pretty-printed JSON object on disk.
///
/// The whole file is rewritten on every update.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, FindSpecCollection>,
}

impl JsonFileStore {
    /// Create a store backed by `path` without reading it.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            values: BTreeMap::new(),
        }
    }

    /// Open a store, loading existing values when the file exists.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(path));
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read knowledge store: {}", path.display()))?;
        let values: BTreeMap<String, FindSpecCollection> = serde_json::from_str(&content)
            .context(format!("Failed to parse knowledge store: {}", path.display()))?;

        debug!("Loaded {} entries from {}", values.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.values)
            .context("Failed to serialize knowledge store")?;
        fs::write(&self.path, json)
            .context(format!("Failed to write knowledge store: {}", self.path.display()))?;
        Ok(())
    }
}

impl KnowledgeStore for JsonFileStore {
    fn set_find_specs(&mut self, key: &str, find_specs: FindSpecCollection) -> Result<()> {
        self.values.insert(key.to_string(), find_specs);
        self.write()?;
        info!("Stored find specifications under {} in {}", key, self.path.display());
        Ok(())
    }

    fn get_find_specs(&self, key: &str) -> Option<FindSpecCollection> {
        self.values.get(key).cloned()
    }
}
