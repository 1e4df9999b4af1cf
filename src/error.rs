//! Error types for artifact filter compilation.
//!
//! Only failures that abort a whole compilation pass are represented here.
//! Problems confined to one pattern or one source are reported as
//! [`Diagnostic`](crate::compiler::Diagnostic) values and never surface as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal error raised to the caller of a compilation pass.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Missing, unreadable or structurally invalid definitions source.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A definition references an artifact that is not defined.
    #[error("Artifact '{artifact}' references undefined artifact '{missing}'")]
    Dependency { artifact: String, missing: String },

    /// I/O failure while reading a definitions or filter file.
    #[error("Unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The knowledge store refused the compiled collection.
    #[error("Unable to publish find specifications: {0}")]
    Store(#[from] anyhow::Error),
}

impl FilterError {
    /// Shorthand for a [`FilterError::Configuration`] with the given message.
    pub fn configuration(message: impl Into<String>) -> Self {
        FilterError::Configuration {
            message: message.into(),
        }
    }
}

/// Result type alias for compilation operations.
pub type Result<T> = std::result::Result<T, FilterError>;
