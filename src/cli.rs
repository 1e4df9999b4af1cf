use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the artifact-filters tool.
///
/// Compiles artifact definitions (or a line-oriented filter file) into
/// find specifications and publishes them to a JSON knowledge store.
#[derive(Parser, Debug)]
#[clap(
    name = "artifact-filters",
    about = "Compile forensic artifact definitions into find specifications",
    group(ArgGroup::new("input").args(["artifacts_filter_file", "filter_file"]))
)]
pub struct Args {
    /// Path to a YAML file or a directory of YAML artifact definitions
    #[clap(long, visible_alias = "artifacts_filter_file")]
    pub artifacts_filter_file: Option<PathBuf>,

    /// Path to a line-oriented path filter file
    #[clap(long)]
    pub filter_file: Option<PathBuf>,

    /// Directory searched for the filter file when the given path does not exist
    #[clap(long)]
    pub data_location: Option<PathBuf>,

    /// Environment attribute used for placeholder expansion (NAME=VALUE, repeatable)
    #[clap(short = 'e', long = "environment", value_name = "NAME=VALUE")]
    pub environment: Vec<String>,

    /// Only compile the named artifacts, expanding groups (repeatable)
    #[clap(short = 'a', long = "artifact", value_name = "NAME")]
    pub artifacts: Vec<String>,

    /// Path to compiler options YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Override the default depth of `**` wildcards
    #[clap(long)]
    pub recursion_limit: Option<usize>,

    /// Log registry keys dropped because of an unsupported hive
    #[clap(long)]
    pub log_dropped_hives: bool,

    /// JSON knowledge store to publish into (default: print to stdout)
    #[clap(long)]
    pub store: Option<PathBuf>,

    /// Write a JSON compilation summary to this path
    #[clap(long)]
    pub summary: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a default compiler options file
    InitConfig {
        /// Path to output options file
        #[clap(default_value = crate::constants::DEFAULT_OPTIONS_FILE)]
        path: PathBuf,
    },
}
