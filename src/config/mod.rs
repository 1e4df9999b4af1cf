// Re-export all items from the submodules
mod definitions;
mod environment;
mod locate;
mod options;
mod reader;

// Re-export definition types
pub use definitions::{
    ArtifactDefinition,
    ArtifactSource,
    KeyValuePair,
    RawAttributes,
    RawDefinition,
    RawSource,
};

// Re-export environment attribute handling
pub use environment::{
    normalize_attribute_value,
    EnvironmentAttribute,
    PathAttributeMap,
};

// Re-export definitions loading
pub use reader::{
    ArtifactDefinitionsReader,
    ArtifactDefinitionsRegistry,
};

pub use locate::locate_filter_file;
pub use options::CompilerOptions;
