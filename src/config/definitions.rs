use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PATH_SEPARATOR;
use crate::error::{FilterError, Result};
use crate::models::TypeIndicator;

/// A registry key and the value name inside it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

/// One typed source entry of an artifact definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    FilePaths { paths: Vec<String>, separator: char },
    RegistryKeys { keys: Vec<String> },
    RegistryValues { pairs: Vec<KeyValuePair> },
    ArtifactGroup { names: Vec<String> },
    Unsupported { type_indicator: String },
}

impl ArtifactSource {
    /// Type indicator as written in the definition.
    pub fn type_name(&self) -> &str {
        match self {
            ArtifactSource::FilePaths { .. } => TypeIndicator::File.as_str(),
            ArtifactSource::RegistryKeys { .. } => TypeIndicator::RegistryKey.as_str(),
            ArtifactSource::RegistryValues { .. } => TypeIndicator::RegistryValue.as_str(),
            ArtifactSource::ArtifactGroup { .. } => TypeIndicator::ArtifactGroup.as_str(),
            ArtifactSource::Unsupported { type_indicator } => type_indicator,
        }
    }
}

/// A named artifact definition with its ordered sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDefinition {
    pub name: String,
    pub doc: Option<String>,
    pub sources: Vec<ArtifactSource>,
    pub labels: Vec<String>,
    pub supported_os: Vec<String>,
    pub urls: Vec<String>,
}

impl ArtifactDefinition {
    pub fn new(name: impl Into<String>, sources: Vec<ArtifactSource>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            sources,
            labels: Vec::new(),
            supported_os: Vec::new(),
            urls: Vec::new(),
        }
    }

    /// Names of the artifacts this definition groups together.
    pub fn group_members(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .filter_map(|source| match source {
                ArtifactSource::ArtifactGroup { names } => Some(names),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
    }
}

/// Artifact definition document as it appears in a YAML file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RawDefinition {
    pub name: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub sources: Vec<RawSource>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub supported_os: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RawSource {
    #[serde(rename = "type")]
    pub type_indicator: Option<String>,
    #[serde(default)]
    pub attributes: RawAttributes,
    #[serde(default)]
    pub supported_os: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RawAttributes {
    #[serde(default)]
    pub paths: Option<Vec<String>>,
    #[serde(default)]
    pub separator: Option<String>,
    #[serde(default)]
    pub keys: Option<Vec<String>>,
    #[serde(default)]
    pub key_value_pairs: Option<Vec<KeyValuePair>>,
    #[serde(default)]
    pub names: Option<Vec<String>>,
}

impl RawDefinition {
    /// Validate the document structure and convert it into a definition.
    pub fn into_definition(self) -> Result<ArtifactDefinition> {
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(FilterError::configuration("Artifact definition is missing a name")),
        };

        let sources = self
            .sources
            .into_iter()
            .map(|source| source.into_source(&name))
            .collect::<Result<Vec<_>>>()?;

        Ok(ArtifactDefinition {
            name,
            doc: self.doc,
            sources,
            labels: self.labels,
            supported_os: self.supported_os,
            urls: self.urls,
        })
    }
}

impl RawSource {
    fn into_source(self, artifact: &str) -> Result<ArtifactSource> {
        let type_name = self.type_indicator.ok_or_else(|| {
            FilterError::configuration(format!("Artifact '{}' has a source without a type", artifact))
        })?;
        let attributes = self.attributes;

        let source = match TypeIndicator::from_definition(&type_name) {
            Some(TypeIndicator::File) => ArtifactSource::FilePaths {
                paths: required(attributes.paths, artifact, &type_name, "paths")?,
                separator: parse_separator(attributes.separator.as_deref(), artifact)?,
            },
            Some(TypeIndicator::RegistryKey) => ArtifactSource::RegistryKeys {
                keys: required(attributes.keys, artifact, &type_name, "keys")?,
            },
            Some(TypeIndicator::RegistryValue) => ArtifactSource::RegistryValues {
                // An absent or empty list yields no keys
                pairs: attributes.key_value_pairs.unwrap_or_default(),
            },
            Some(TypeIndicator::ArtifactGroup) => ArtifactSource::ArtifactGroup {
                names: required(attributes.names, artifact, &type_name, "names")?,
            },
            None => ArtifactSource::Unsupported {
                type_indicator: type_name,
            },
        };

        Ok(source)
    }
}

fn required(
    value: Option<Vec<String>>,
    artifact: &str,
    type_name: &str,
    attribute: &str,
) -> Result<Vec<String>> {
    value.ok_or_else(|| {
        FilterError::configuration(format!(
            "Artifact '{}' has a {} source without '{}'",
            artifact, type_name, attribute
        ))
    })
}

fn parse_separator(separator: Option<&str>, artifact: &str) -> Result<char> {
    let Some(separator) = separator else {
        return Ok(DEFAULT_PATH_SEPARATOR);
    };

    let mut chars = separator.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(FilterError::configuration(format!(
            "Artifact '{}' has an invalid path separator: {:?}",
            artifact, separator
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<ArtifactDefinition> {
        let raw: RawDefinition = serde_yaml::from_str(yaml).unwrap();
        raw.into_definition()
    }

    #[test]
    fn test_file_source_with_separator() {
        let definition = parse(
            r#"
name: TestFiles
doc: Test Doc
sources:
- type: FILE
  attributes:
    paths: ['%%environ_systemdrive%%\AUTHORS']
    separator: '\'
labels: [System]
supported_os: [Windows]
"#,
        )
        .unwrap();

        assert_eq!(definition.name, "TestFiles");
        assert_eq!(definition.doc.as_deref(), Some("Test Doc"));
        assert_eq!(definition.supported_os, vec!["Windows".to_string()]);
        assert_eq!(
            definition.sources,
            vec![ArtifactSource::FilePaths {
                paths: vec!["%%environ_systemdrive%%\\AUTHORS".to_string()],
                separator: '\\',
            }]
        );
    }

    #[test]
    fn test_file_source_default_separator() {
        let definition = parse(
            "name: Logs\nsources:\n- type: FILE\n  attributes:\n    paths: ['/var/log/*']\n",
        )
        .unwrap();

        match &definition.sources[0] {
            ArtifactSource::FilePaths { separator, .. } => assert_eq!(*separator, '/'),
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn test_registry_value_pairs() {
        let definition = parse(
            r#"
name: TestRegistryValue
sources:
- type: REGISTRY_VALUE
  attributes:
    key_value_pairs: [{key: 'HKEY_LOCAL_MACHINE\System\CurrentControlSet\Control\Session Manager', value: 'BootExecute'}]
"#,
        )
        .unwrap();

        match &definition.sources[0] {
            ArtifactSource::RegistryValues { pairs } => {
                assert_eq!(pairs.len(), 1);
                assert_eq!(pairs[0].value, "BootExecute");
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn test_registry_value_without_pairs_is_empty() {
        let definition = parse("name: Empty\nsources:\n- type: REGISTRY_VALUE\n").unwrap();
        assert_eq!(
            definition.sources,
            vec![ArtifactSource::RegistryValues { pairs: vec![] }]
        );
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let definition = parse(
            "name: Wmi\nsources:\n- type: WMI\n  attributes:\n    query: SELECT * FROM Win32_Service\n",
        )
        .unwrap();
        assert_eq!(definition.sources[0].type_name(), "WMI");
    }

    #[test]
    fn test_group_members() {
        let definition = parse(
            "name: Group\nsources:\n- type: ARTIFACT_GROUP\n  attributes:\n    names: [A, B]\n",
        )
        .unwrap();
        assert_eq!(definition.group_members().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_structural_errors() {
        assert!(parse("doc: no name\n").is_err());
        assert!(parse("name: ''\n").is_err());
        assert!(parse("name: NoPaths\nsources:\n- type: FILE\n").is_err());
        assert!(parse("name: NoKeys\nsources:\n- type: REGISTRY_KEY\n").is_err());
        assert!(parse("name: NoType\nsources:\n- attributes: {}\n").is_err());

        let err = parse(
            "name: BadSep\nsources:\n- type: FILE\n  attributes:\n    paths: ['/a']\n    separator: '//'\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid path separator"));
    }
}
