//! # artifact-filters
//!
//! Compiles declarative forensic artifact definitions into concrete,
//! engine-ready search specifications, so that evidence can be collected
//! selectively from a disk image or live system instead of scanning
//! everything.
//!
//! ## Overview
//!
//! Artifact definitions describe interesting files and Windows Registry
//! locations in an abstract form: paths carry `%%environ_<name>%%`
//! placeholders and bounded `**N` recursive wildcards, registry keys may be
//! rooted at any hive. A compilation pass resolves all of that against the
//! environment of the evidence source and produces a [`FindSpecCollection`]
//! grouped by source type.
//!
//! ## Features
//!
//! - **File path sources**: placeholder substitution, bounded recursive
//!   wildcards, segmentation into absolute, root-less glob segments
//! - **Registry key and value sources**: deduplication, hive allow-list,
//!   value sources degraded to their keys
//! - **Fault isolation**: a malformed pattern is skipped and reported, never
//!   aborting the pass
//! - **Artifact groups**: selective compilation of named artifacts
//! - **Legacy filter files**: one regular-expression path per line
//!
//! ## Usage
//!
//! ```no_run
//! use artifact_filters::compiler::FindSpecCompiler;
//! use artifact_filters::config::EnvironmentAttribute;
//! use artifact_filters::store::{KnowledgeBase, KnowledgeStore};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let environment = vec![EnvironmentAttribute::new("SystemDrive", "C:")];
//! let mut store = KnowledgeBase::new();
//!
//! let compilation = FindSpecCompiler::default().build_find_specs(
//!     Path::new("artifacts/windows.yaml"),
//!     Some(environment.as_slice()),
//!     &mut store,
//! )?;
//!
//! println!("Compiled {} find specifications", compilation.find_specs.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions
//! - [`models`]: Find specifications and their collection
//! - [`config`]: Artifact definitions, environment attributes and options
//! - [`compiler`]: The compilation pass and its components
//! - [`store`]: Knowledge stores receiving the compiled collection
//! - [`utils`]: Compilation summaries
//! - [`constants`]: Application-wide constants
//! - [`error`]: Fatal error taxonomy

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models: find specifications and their collection
pub mod models;

/// Artifact definitions, environment attributes and compiler options
pub mod config;

/// Compilation of artifact sources into find specifications
pub mod compiler;

/// Knowledge stores for publishing compiled collections
pub mod store;

/// Utility functions for compilation summaries
pub mod utils;

/// Application constants and configuration values
pub mod constants;

/// Errors that abort a compilation pass
pub mod error;

pub use models::{FindSpec, FindSpecCollection, TypeIndicator};
