use crate::constants::REGISTRY_KEY_SEPARATOR;

/// Root hive of a registry key path: everything before the first separator.
pub fn root_hive(key: &str) -> &str {
    key.split_once(REGISTRY_KEY_SEPARATOR)
        .map_or(key, |(hive, _)| hive)
}

/// Allow-list of registry root hives the registry searcher can honor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiveFilter {
    supported: Vec<String>,
}

impl HiveFilter {
    pub fn new<I, S>(supported: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported: supported.into_iter().map(Into::into).collect(),
        }
    }

    /// Hive names compare case-insensitively, as the registry does.
    pub fn is_supported(&self, key: &str) -> bool {
        let hive = root_hive(key);
        self.supported
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(hive))
    }
}
