use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag distinguishing the kinds of artifact sources.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeIndicator {
    File,
    RegistryKey,
    RegistryValue,
    ArtifactGroup,
}

impl TypeIndicator {
    /// Parse the indicator used in artifact definition files.
    pub fn from_definition(value: &str) -> Option<Self> {
        match value {
            "FILE" | "PATH" => Some(TypeIndicator::File),
            "REGISTRY_KEY" => Some(TypeIndicator::RegistryKey),
            "REGISTRY_VALUE" => Some(TypeIndicator::RegistryValue),
            "ARTIFACT_GROUP" => Some(TypeIndicator::ArtifactGroup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeIndicator::File => "FILE",
            TypeIndicator::RegistryKey => "REGISTRY_KEY",
            TypeIndicator::RegistryValue => "REGISTRY_VALUE",
            TypeIndicator::ArtifactGroup => "ARTIFACT_GROUP",
        }
    }
}

impl fmt::Display for TypeIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A compiled, engine-ready search specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum FindSpec {
    /// Segmented file path; the root segment is never included.
    FilePath {
        segments: Vec<String>,
        case_sensitive: bool,
        /// Segments are glob patterns when set, regular expressions otherwise.
        glob: bool,
    },
    /// Full registry key glob, not segmented.
    RegistryKey { key_glob: String },
}

impl FindSpec {
    pub fn file_glob(segments: Vec<String>) -> Self {
        FindSpec::FilePath {
            segments,
            case_sensitive: false,
            glob: true,
        }
    }

    pub fn file_regex(segments: Vec<String>) -> Self {
        FindSpec::FilePath {
            segments,
            case_sensitive: false,
            glob: false,
        }
    }

    pub fn registry_key(key_glob: impl Into<String>) -> Self {
        FindSpec::RegistryKey {
            key_glob: key_glob.into(),
        }
    }
}

/// Compiled find specifications grouped by source type indicator.
///
/// Specs keep discovery order within a bucket and are not deduplicated.
/// A bucket exists only when at least one spec was produced for it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FindSpecCollection {
    buckets: BTreeMap<TypeIndicator, Vec<FindSpec>>,
}

impl FindSpecCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a spec, creating the bucket on first use.
    pub fn append(&mut self, type_indicator: TypeIndicator, spec: FindSpec) {
        self.buckets.entry(type_indicator).or_default().push(spec);
    }

    pub fn get(&self, type_indicator: TypeIndicator) -> Option<&[FindSpec]> {
        self.buckets.get(&type_indicator).map(Vec::as_slice)
    }

    pub fn contains(&self, type_indicator: TypeIndicator) -> bool {
        self.buckets.contains_key(&type_indicator)
    }

    /// Total number of specs across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeIndicator, &[FindSpec])> {
        self.buckets
            .iter()
            .map(|(type_indicator, specs)| (*type_indicator, specs.as_slice()))
    }
}
