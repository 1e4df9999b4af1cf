use std::collections::HashMap;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

lazy_static! {
    static ref DRIVE_LETTER: Regex = Regex::new(r"^[A-Za-z]:(?P<rest>.*)$").unwrap();
}

/// A runtime environment variable, as discovered on the evidence source.
///
/// The value is kept as loosely typed JSON because environment values
/// collected from a system are not guaranteed to be textual.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EnvironmentAttribute {
    pub name: String,
    pub value: Value,
}

impl EnvironmentAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse a `NAME=VALUE` pair as given on the command line.
    pub fn parse_assignment(assignment: &str) -> Option<Self> {
        let (name, value) = assignment.split_once('=')?;
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, value))
    }
}

/// Lookup table of lower-cased attribute names to normalized path values.
///
/// Values have any `X:` drive prefix removed and back-slashes replaced by
/// forward slashes. Rebuilt for every compilation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathAttributeMap {
    attributes: HashMap<String, String>,
}

impl PathAttributeMap {
    /// Build the map from an optional list of environment attributes.
    ///
    /// Non-textual values are skipped. A later attribute with the same
    /// (case-insensitive) name replaces an earlier one.
    pub fn from_environment(environment: Option<&[EnvironmentAttribute]>) -> Self {
        let mut attributes = HashMap::new();

        for attribute in environment.unwrap_or_default() {
            let Some(value) = attribute.value.as_str() else {
                debug!("Ignoring non-string environment attribute: {}", attribute.name);
                continue;
            };

            attributes.insert(attribute.name.to_lowercase(), normalize_attribute_value(value));
        }

        Self { attributes }
    }

    /// Look up an attribute by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Strip a drive letter prefix and convert to forward slashes.
pub fn normalize_attribute_value(value: &str) -> String {
    let without_drive = match DRIVE_LETTER.captures(value) {
        Some(captures) => captures.name("rest").map_or("", |rest| rest.as_str()),
        None => value,
    };

    without_drive.replace('\\', "/")
}
