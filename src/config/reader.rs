use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::config::definitions::{ArtifactDefinition, RawDefinition};
use crate::constants::DEFINITION_FILE_EXTENSIONS;
use crate::error::{FilterError, Result};

/// Reads artifact definitions from YAML files.
pub struct ArtifactDefinitionsReader;

impl ArtifactDefinitionsReader {
    /// Read definitions from a single file or from every YAML file in a directory.
    ///
    /// Directory entries are read in file name order so that the resulting
    /// definition order, and therefore the compiled spec order, is stable.
    pub fn read_path(path: &Path) -> Result<Vec<ArtifactDefinition>> {
        if path.is_dir() {
            Self::read_directory(path)
        } else {
            Self::read_file(path)
        }
    }

    /// Read all definitions from one YAML file.
    pub fn read_file(path: &Path) -> Result<Vec<ArtifactDefinition>> {
        let content = fs::read_to_string(path).map_err(|source| FilterError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let definitions = Self::read_str(&content).map_err(|e| {
            FilterError::configuration(format!(
                "Unable to read artifact definitions from: {} with error: {}",
                path.display(),
                e
            ))
        })?;

        debug!("Read {} artifact definitions from {}", definitions.len(), path.display());
        Ok(definitions)
    }

    /// Read definitions from YAML text holding one or more `---` separated documents.
    pub fn read_str(content: &str) -> Result<Vec<ArtifactDefinition>> {
        let mut definitions = Vec::new();

        for document in serde_yaml::Deserializer::from_str(content) {
            let value = serde_yaml::Value::deserialize(document)
                .map_err(|e| FilterError::configuration(format!("Malformed YAML: {}", e)))?;

            // Trailing separators produce empty documents
            if value.is_null() {
                continue;
            }

            let raw: RawDefinition = serde_yaml::from_value(value).map_err(|e| {
                FilterError::configuration(format!("Malformed artifact definition: {}", e))
            })?;
            definitions.push(raw.into_definition()?);
        }

        Ok(definitions)
    }

    fn read_directory(path: &Path) -> Result<Vec<ArtifactDefinition>> {
        let mut files: Vec<PathBuf> = Vec::new();

        for entry in WalkDir::new(path).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| FilterError::Io {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

            if entry.file_type().is_file() && has_definition_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }

        let mut definitions = Vec::new();
        for file in &files {
            definitions.extend(Self::read_file(file)?);
        }

        info!(
            "Read {} artifact definitions from {} files in {}",
            definitions.len(),
            files.len(),
            path.display()
        );
        Ok(definitions)
    }
}

fn has_definition_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            DEFINITION_FILE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Loaded artifact definitions, in load order, addressable by name.
#[derive(Debug, Clone, Default)]
pub struct ArtifactDefinitionsRegistry {
    definitions: Vec<ArtifactDefinition>,
    index: HashMap<String, usize>,
}

impl ArtifactDefinitionsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate definitions from a file or directory.
    pub fn read_from_path(path: &Path) -> Result<Self> {
        let mut registry = Self::new();
        for definition in ArtifactDefinitionsReader::read_path(path)? {
            registry.register(definition)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Build a validated registry from already parsed definitions.
    pub fn from_definitions(definitions: Vec<ArtifactDefinition>) -> Result<Self> {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Add a definition; names must be unique.
    pub fn register(&mut self, definition: ArtifactDefinition) -> Result<()> {
        if self.index.contains_key(&definition.name) {
            return Err(FilterError::configuration(format!(
                "Artifact definition already set for name: {}",
                definition.name
            )));
        }

        self.index.insert(definition.name.clone(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Check that every group member refers to a registered definition.
    pub fn validate(&self) -> Result<()> {
        for definition in &self.definitions {
            for member in definition.group_members() {
                if !self.index.contains_key(member) {
                    return Err(FilterError::Dependency {
                        artifact: definition.name.clone(),
                        missing: member.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactDefinition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    pub fn definitions(&self) -> &[ArtifactDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
