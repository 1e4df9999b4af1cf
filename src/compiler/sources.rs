use std::collections::HashSet;

use log::debug;

use crate::compiler::aggregator::FindSpecAggregator;
use crate::compiler::diagnostics::{Diagnostic, Diagnostics, SkipReason};
use crate::compiler::glob::expand_recursive_glob;
use crate::compiler::hive::{root_hive, HiveFilter};
use crate::compiler::segmenter::segment_pattern;
use crate::compiler::template::{expand_placeholders, has_unresolved_placeholder};
use crate::config::{ArtifactSource, CompilerOptions, KeyValuePair, PathAttributeMap};
use crate::constants::REGISTRY_KEY_SEPARATOR;
use crate::models::{FindSpec, TypeIndicator};

/// Compiles individual artifact sources into find specifications.
pub struct SourceCompiler<'a> {
    attributes: &'a PathAttributeMap,
    hive_filter: HiveFilter,
    recursive_glob_limit: usize,
}

impl<'a> SourceCompiler<'a> {
    pub fn new(attributes: &'a PathAttributeMap, options: &CompilerOptions) -> Self {
        Self {
            attributes,
            hive_filter: HiveFilter::new(options.supported_hives.iter().cloned()),
            recursive_glob_limit: options.recursive_glob_limit,
        }
    }

    /// Compile one source of `artifact` into the aggregator.
    pub fn compile_source(
        &self,
        artifact: &str,
        source: &ArtifactSource,
        aggregator: &mut FindSpecAggregator,
        diagnostics: &mut Diagnostics,
    ) {
        match source {
            ArtifactSource::FilePaths { paths, separator } => {
                self.compile_file_paths(artifact, paths, *separator, aggregator, diagnostics)
            }
            ArtifactSource::RegistryKeys { keys } => self.compile_registry_keys(
                artifact,
                keys.iter().map(String::as_str),
                aggregator,
                diagnostics,
            ),
            ArtifactSource::RegistryValues { pairs } => {
                self.compile_registry_values(artifact, pairs, aggregator, diagnostics)
            }
            ArtifactSource::ArtifactGroup { names } => {
                debug!(
                    "[{}] artifact group of {} members, members compile on their own",
                    artifact,
                    names.len()
                );
            }
            ArtifactSource::Unsupported { type_indicator } => {
                diagnostics.record(Diagnostic::UnsupportedSource {
                    artifact: artifact.to_string(),
                    type_indicator: type_indicator.clone(),
                });
            }
        }
    }

    fn compile_file_paths(
        &self,
        artifact: &str,
        paths: &[String],
        separator: char,
        aggregator: &mut FindSpecAggregator,
        diagnostics: &mut Diagnostics,
    ) {
        for path in paths {
            for variant in expand_recursive_glob(path, separator, self.recursive_glob_limit) {
                match segment_pattern(&variant, separator, self.attributes) {
                    Ok(segments) => aggregator.append(TypeIndicator::File, FindSpec::file_glob(segments)),
                    Err(reason) => diagnostics.record(Diagnostic::PatternSkipped {
                        artifact: artifact.to_string(),
                        pattern: variant,
                        reason,
                    }),
                }
            }
        }
    }

    fn compile_registry_keys<'k>(
        &self,
        artifact: &str,
        keys: impl Iterator<Item = &'k str>,
        aggregator: &mut FindSpecAggregator,
        diagnostics: &mut Diagnostics,
    ) {
        let mut seen = HashSet::new();

        for key in keys {
            if !seen.insert(key) {
                continue;
            }

            if !self.hive_filter.is_supported(key) {
                diagnostics.record(Diagnostic::HiveDropped {
                    artifact: artifact.to_string(),
                    key: key.to_string(),
                    hive: root_hive(key).to_string(),
                });
                continue;
            }

            for variant in expand_recursive_glob(key, REGISTRY_KEY_SEPARATOR, self.recursive_glob_limit) {
                match self.resolve_key(&variant) {
                    Ok(key_glob) => {
                        aggregator.append(TypeIndicator::RegistryKey, FindSpec::registry_key(key_glob))
                    }
                    Err(reason) => diagnostics.record(Diagnostic::PatternSkipped {
                        artifact: artifact.to_string(),
                        pattern: variant,
                        reason,
                    }),
                }
            }
        }
    }

    fn compile_registry_values(
        &self,
        artifact: &str,
        pairs: &[KeyValuePair],
        aggregator: &mut FindSpecAggregator,
        diagnostics: &mut Diagnostics,
    ) {
        for pair in pairs {
            diagnostics.record(Diagnostic::ValueDegraded {
                artifact: artifact.to_string(),
                key: pair.key.clone(),
                value_name: pair.value.clone(),
            });
        }

        self.compile_registry_keys(
            artifact,
            pairs.iter().map(|pair| pair.key.as_str()),
            aggregator,
            diagnostics,
        );
    }

    fn resolve_key(&self, key: &str) -> Result<String, SkipReason> {
        let key_glob = expand_placeholders(key, self.attributes, REGISTRY_KEY_SEPARATOR)?;
        if has_unresolved_placeholder(&key_glob) {
            return Err(SkipReason::UnresolvedPlaceholder);
        }
        Ok(key_glob)
    }
}
