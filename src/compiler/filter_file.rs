use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::compiler::aggregator::FindSpecAggregator;
use crate::compiler::diagnostics::{Diagnostic, Diagnostics};
use crate::compiler::segmenter::split_absolute;
use crate::compiler::template::format_attributes;
use crate::compiler::Compilation;
use crate::config::{EnvironmentAttribute, PathAttributeMap};
use crate::constants::{DEFAULT_PATH_SEPARATOR, FILTER_FILE_COMMENT_PREFIX};
use crate::error::{FilterError, Result};
use crate::models::{FindSpec, TypeIndicator};

/// Line-oriented path filter file.
///
/// Each non-comment line is an absolute `/` separated path whose segments
/// are regular expressions. When environment attributes are given,
/// `{attribute}` placeholders are replaced and literal braces are written
/// as `{{` and `}}`. Without attributes lines are used verbatim.
#[derive(Debug, Clone)]
pub struct FilterFile {
    path: PathBuf,
}

impl FilterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build file find specifications from every usable line.
    ///
    /// Only an unreadable file is an error; bad lines are skipped and
    /// reported as diagnostics.
    pub fn build_find_specs(
        &self,
        environment: Option<&[EnvironmentAttribute]>,
    ) -> Result<Compilation> {
        let content = fs::read_to_string(&self.path).map_err(|source| FilterError::Io {
            path: self.path.clone(),
            source,
        })?;

        let attributes = PathAttributeMap::from_environment(environment);
        let source_name = self.path.display().to_string();
        let mut aggregator = FindSpecAggregator::new();
        let mut diagnostics = Diagnostics::new(false);

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(FILTER_FILE_COMMENT_PREFIX) {
                continue;
            }

            // Without attributes the line is a plain regular expression
            let resolved = if attributes.is_empty() {
                split_absolute(line, DEFAULT_PATH_SEPARATOR)
            } else {
                format_attributes(line, &attributes)
                    .and_then(|path| split_absolute(&path, DEFAULT_PATH_SEPARATOR))
            };

            match resolved {
                Ok(segments) => {
                    debug!("Path filter: {}", line);
                    aggregator.append(TypeIndicator::File, FindSpec::file_regex(segments));
                }
                Err(reason) => diagnostics.record(Diagnostic::PatternSkipped {
                    artifact: source_name.clone(),
                    pattern: line.to_string(),
                    reason,
                }),
            }
        }

        info!(
            "Read {} path filters from {}",
            aggregator.collection().len(),
            self.path.display()
        );

        Ok(Compilation {
            find_specs: aggregator.into_collection(),
            diagnostics: diagnostics.into_entries(),
            definitions_compiled: 1,
        })
    }
}
