use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use artifact_filters::cli::{Args, Commands};
use artifact_filters::compiler::{Compilation, FilterFile, FindSpecCompiler};
use artifact_filters::config::{
    locate_filter_file, ArtifactDefinitionsRegistry, CompilerOptions, EnvironmentAttribute,
};
use artifact_filters::store::{JsonFileStore, KnowledgeStore};
use artifact_filters::utils::summary;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Handle subcommands
    if let Some(cmd) = &args.command {
        return handle_subcommand(cmd);
    }

    let options = load_options(&args)?;
    let environment = parse_environment(&args.environment)?;

    // Compile the requested input
    let (source, compilation) = compile(&args, &options, &environment)?;

    // Publish the collection
    publish(&args, &options, &compilation)?;

    // Write compilation summary
    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &source, &options, &compilation)?;
    }

    if compilation.skipped() > 0 {
        warn!(
            "{} patterns or sources were skipped, see the log for details",
            compilation.skipped()
        );
    }
    info!("Compilation completed successfully");
    Ok(())
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Handle subcommands (init-config)
fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitConfig { path } => {
            info!("Creating default compiler options file at {}", path.display());
            CompilerOptions::default().save_to_yaml_file(path)?;
            info!("Configuration created successfully");
            Ok(())
        }
    }
}

/// Load compiler options and apply command-line overrides
fn load_options(args: &Args) -> Result<CompilerOptions> {
    let mut options = CompilerOptions::load_or_default(args.config.as_deref())?;

    if let Some(limit) = args.recursion_limit {
        options.recursive_glob_limit = limit;
    }
    if args.log_dropped_hives {
        options.log_dropped_hives = true;
    }

    Ok(options)
}

/// Parse `NAME=VALUE` environment attributes
fn parse_environment(assignments: &[String]) -> Result<Vec<EnvironmentAttribute>> {
    assignments
        .iter()
        .map(|assignment| {
            EnvironmentAttribute::parse_assignment(assignment)
                .ok_or_else(|| anyhow!("Invalid environment attribute (expected NAME=VALUE): {}", assignment))
        })
        .collect()
}

/// Compile artifact definitions or a line-oriented filter file
fn compile(
    args: &Args,
    options: &CompilerOptions,
    environment: &[EnvironmentAttribute],
) -> Result<(String, Compilation)> {
    let environment = (!environment.is_empty()).then_some(environment);

    if let Some(filter_file) = &args.filter_file {
        let path = locate_filter_file(filter_file, args.data_location.as_deref())?;
        info!("Reading path filters from {}", path.display());

        let compilation = FilterFile::new(&path).build_find_specs(environment)?;
        return Ok((path.display().to_string(), compilation));
    }

    let definitions = args
        .artifacts_filter_file
        .as_ref()
        .ok_or_else(|| anyhow!("No input given, use --artifacts-filter-file or --filter-file"))?;
    let path = locate_filter_file(definitions, args.data_location.as_deref())?;
    info!("Reading artifact definitions from {}", path.display());

    let registry = ArtifactDefinitionsRegistry::read_from_path(&path)?;
    let compiler = FindSpecCompiler::new(options.clone());

    let compilation = if args.artifacts.is_empty() {
        compiler.compile(registry.definitions(), environment)
    } else {
        compiler.compile_selected(&registry, &args.artifacts, environment)?
    };

    Ok((path.display().to_string(), compilation))
}

/// Publish to the JSON knowledge store, or print the collection
fn publish(args: &Args, options: &CompilerOptions, compilation: &Compilation) -> Result<()> {
    match &args.store {
        Some(store_path) => {
            let mut store = JsonFileStore::open(store_path)?;
            store.set_find_specs(&options.store_key, compilation.find_specs.clone())?;
        }
        None => {
            let json = serde_json::to_string_pretty(&compilation.find_specs)
                .context("Failed to serialize find specifications")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Write compilation summary
fn write_summary(
    summary_path: &Path,
    source: &str,
    options: &CompilerOptions,
    compilation: &Compilation,
) -> Result<()> {
    let summary_json = summary::create_compilation_summary(source, &options.store_key, compilation)?;

    fs::write(summary_path, &summary_json).context("Failed to write compilation summary")?;

    info!("Compilation summary written to {}", summary_path.display());
    Ok(())
}
