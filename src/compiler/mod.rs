//! Compilation of artifact definitions into find specifications.
//!
//! A pass reads every source of every definition, expands recursive
//! wildcards, substitutes environment placeholders, segments and validates
//! the result and groups the surviving specifications by source type.
//! Problems confined to one pattern or source are recorded as
//! [`Diagnostic`]s and never abort the pass.

mod aggregator;
mod diagnostics;
mod filter_file;
mod glob;
mod hive;
mod segmenter;
mod sources;
mod template;

use std::collections::HashSet;
use std::path::Path;

use log::info;

use crate::config::{
    ArtifactDefinition, ArtifactDefinitionsRegistry, CompilerOptions, EnvironmentAttribute,
    PathAttributeMap,
};
use crate::error::{FilterError, Result};
use crate::models::FindSpecCollection;
use crate::store::KnowledgeStore;

pub use aggregator::FindSpecAggregator;
pub use diagnostics::{Diagnostic, Diagnostics, SkipReason};
pub use filter_file::FilterFile;
pub use glob::{expand_recursive_glob, RecursiveGlobExpansion};
pub use hive::{root_hive, HiveFilter};
pub use segmenter::{segment_pattern, split_absolute};
pub use sources::SourceCompiler;
pub use template::{expand_placeholders, format_attributes, has_unresolved_placeholder};

/// Result of one compilation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub find_specs: FindSpecCollection,
    pub diagnostics: Vec<Diagnostic>,
    pub definitions_compiled: usize,
}

impl Compilation {
    /// Number of patterns or sources left out of the collection.
    pub fn skipped(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_skip()).count()
    }
}

/// Compiles artifact definitions with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct FindSpecCompiler {
    options: CompilerOptions,
}

impl FindSpecCompiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile every source of every definition, in order.
    pub fn compile<'d, I>(
        &self,
        definitions: I,
        environment: Option<&[EnvironmentAttribute]>,
    ) -> Compilation
    where
        I: IntoIterator<Item = &'d ArtifactDefinition>,
    {
        let (aggregator, diagnostics, definitions_compiled) = self.run(definitions, environment);

        Compilation {
            find_specs: aggregator.into_collection(),
            diagnostics: diagnostics.into_entries(),
            definitions_compiled,
        }
    }

    /// Compile only the named definitions, expanding artifact groups.
    ///
    /// Each definition is compiled at most once even when reachable
    /// through several groups.
    pub fn compile_selected(
        &self,
        registry: &ArtifactDefinitionsRegistry,
        names: &[String],
        environment: Option<&[EnvironmentAttribute]>,
    ) -> Result<Compilation> {
        let mut seen = HashSet::new();
        let mut selected = Vec::new();

        for name in names {
            select_definition(registry, name, &mut seen, &mut selected)?;
        }

        Ok(self.compile(selected, environment))
    }

    /// Compile `definitions` and publish the collection to `store`.
    pub fn compile_and_publish<'d, I>(
        &self,
        definitions: I,
        environment: Option<&[EnvironmentAttribute]>,
        store: &mut dyn KnowledgeStore,
    ) -> Result<Compilation>
    where
        I: IntoIterator<Item = &'d ArtifactDefinition>,
    {
        let (aggregator, diagnostics, definitions_compiled) = self.run(definitions, environment);
        aggregator.publish(store, &self.options.store_key)?;

        Ok(Compilation {
            find_specs: aggregator.into_collection(),
            diagnostics: diagnostics.into_entries(),
            definitions_compiled,
        })
    }

    /// Read definitions from `path`, compile them and publish the result.
    ///
    /// Unreadable or malformed definitions and undefined group members
    /// abort the pass before anything is published.
    pub fn build_find_specs(
        &self,
        path: &Path,
        environment: Option<&[EnvironmentAttribute]>,
        store: &mut dyn KnowledgeStore,
    ) -> Result<Compilation> {
        let registry = ArtifactDefinitionsRegistry::read_from_path(path)?;
        self.compile_and_publish(registry.definitions(), environment, store)
    }

    fn run<'d, I>(
        &self,
        definitions: I,
        environment: Option<&[EnvironmentAttribute]>,
    ) -> (FindSpecAggregator, Diagnostics, usize)
    where
        I: IntoIterator<Item = &'d ArtifactDefinition>,
    {
        let attributes = PathAttributeMap::from_environment(environment);
        let compiler = SourceCompiler::new(&attributes, &self.options);
        let mut aggregator = FindSpecAggregator::new();
        let mut diagnostics = Diagnostics::new(self.options.log_dropped_hives);
        let mut count = 0;

        for definition in definitions {
            for source in &definition.sources {
                compiler.compile_source(&definition.name, source, &mut aggregator, &mut diagnostics);
            }
            count += 1;
        }

        info!(
            "Compiled {} artifact definitions into {} find specifications ({} diagnostics)",
            count,
            aggregator.collection().len(),
            diagnostics.entries().len()
        );
        (aggregator, diagnostics, count)
    }
}

fn select_definition<'r>(
    registry: &'r ArtifactDefinitionsRegistry,
    name: &str,
    seen: &mut HashSet<String>,
    selected: &mut Vec<&'r ArtifactDefinition>,
) -> Result<()> {
    if !seen.insert(name.to_string()) {
        return Ok(());
    }

    let definition = registry
        .get(name)
        .ok_or_else(|| FilterError::configuration(format!("Unknown artifact: {}", name)))?;
    selected.push(definition);

    for member in definition.group_members() {
        select_definition(registry, member, seen, selected)?;
    }
    Ok(())
}
