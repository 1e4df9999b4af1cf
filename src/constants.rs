//! Global constants for the artifact filter compiler.
//!
//! This module centralizes the fixed identifiers and limits shared by the
//! compiler, the definitions reader and the knowledge store.

// Knowledge store constants
/// Key under which a compiled find specification collection is published
pub const ARTIFACTS_FILTER_FILE_KEY: &str = "ARTIFACTS_FILTER_FILE";

// Wildcard expansion constants
/// Number of depth variants produced for a `**` marker without an explicit count
pub const DEFAULT_RECURSIVE_GLOB_LIMIT: usize = 10;

/// Marker requesting bounded recursive expansion
pub const RECURSIVE_GLOB_MARKER: &str = "**";

/// Upper bound on the depth variants of a single `**` marker
pub const MAX_RECURSIVE_GLOB_DEPTH: usize = 99;

/// One-level wildcard appended per expansion depth
pub const SINGLE_LEVEL_WILDCARD: &str = "*";

// Placeholder constants
/// Start and end marker of an artifact placeholder token
pub const PLACEHOLDER_MARKER: &str = "%%";

/// Prefix of placeholder tokens resolved from environment attributes
pub const ENVIRON_PLACEHOLDER_PREFIX: &str = "environ_";

// Separator constants
/// Default path separator for file sources
pub const DEFAULT_PATH_SEPARATOR: char = '/';

/// Separator used inside Windows Registry key paths
pub const REGISTRY_KEY_SEPARATOR: char = '\\';

// Registry constants
/// Root hives the downstream registry searcher can honor
pub const SUPPORTED_REGISTRY_HIVES: &[&str] = &["HKEY_LOCAL_MACHINE"];

// Definition file constants
/// File extensions recognized when reading a directory of definitions
pub const DEFINITION_FILE_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Comment prefix in line-oriented filter files
pub const FILTER_FILE_COMMENT_PREFIX: char = '#';

// CLI constants
/// Default path written by the `init-config` subcommand
pub const DEFAULT_OPTIONS_FILE: &str = "artifact_filters.yaml";
