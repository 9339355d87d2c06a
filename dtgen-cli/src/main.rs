//! # dtgen
//!
//! CLI tool for generating C++ headers and Rust modules from type
//! descriptor documents.
//!
//! ## Usage
//!
//! ```bash
//! # Generate headers for every descriptor below ./descriptors
//! dtgen generate --input ./descriptors
//!
//! # Generate Rust modules instead
//! dtgen generate --input ./descriptors --language rust
//!
//! # Preview without writing
//! dtgen generate --dry-run
//!
//! # Emit the C++ support library
//! dtgen support --output ./include
//!
//! # Report option mismatches against the support library
//! dtgen check --input ./descriptors
//!
//! # Check that generated files are up to date
//! dtgen validate --input ./descriptors --output ./generated
//!
//! # Initialize configuration
//! dtgen init
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use dtgen_codegen::generator::VariantStrategy;
use dtgen_codegen::{BatchFailure, BatchReport, DescriptorRegistry};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dtgen_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::{CliError, CliResult, LoadError},
    generator::ProjectGenerator,
    loader::DescriptorLoader,
    scanner::DescriptorScanner,
    writer::{FileStatus, FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "dtgen")]
#[command(author, version, about = "Generate C++ headers and Rust modules from type descriptors", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code from descriptor files
    Generate {
        /// Directory containing descriptor files
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory for generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target language (cpp, rust)
        #[arg(short, long)]
        language: Option<String>,

        /// Union representation (auto, library, fallback)
        #[arg(long, value_parser = parse_strategy)]
        variant_strategy: Option<VariantStrategy>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter descriptor files by relative path (glob)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Validate that generated files are up to date
    Validate {
        /// Directory containing descriptor files
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Directory holding the generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Emit the support library headers
    Support {
        /// Output directory for the support library
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Report language option mismatches against the support library
    Check {
        /// Directory containing descriptor files
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a new dtgen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "dtgen.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn parse_strategy(value: &str) -> Result<VariantStrategy, String> {
    match value {
        "auto" => Ok(VariantStrategy::Auto),
        "library" => Ok(VariantStrategy::Library),
        "fallback" => Ok(VariantStrategy::Fallback),
        other => Err(format!("'{}' is not one of auto, library, fallback", other)),
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            language,
            variant_strategy,
            dry_run,
            config,
            filter,
        } => {
            let args = CliArgs {
                output,
                language,
                variant_strategy,
                ..Default::default()
            };
            let config = load_config(config.as_deref(), &args)?;
            cmd_generate(&input, &config, filter.as_deref(), dry_run)
        }

        Commands::Validate {
            input,
            output,
            config,
        } => {
            let args = CliArgs {
                output,
                ..Default::default()
            };
            cmd_validate(&input, &load_config(config.as_deref(), &args)?)
        }

        Commands::Support { output, config } => {
            let args = CliArgs {
                output,
                ..Default::default()
            };
            cmd_support(&load_config(config.as_deref(), &args)?)
        }

        Commands::Check { input, config } => {
            cmd_check(&input, &load_config(config.as_deref(), &CliArgs::default())?)
        }

        Commands::Init { output, force } => cmd_init(&output, force),
    }
}

fn load_config(path: Option<&Path>, args: &CliArgs) -> CliResult<Config> {
    let config = ConfigManager::merge_cli_args(ConfigManager::load(path)?, args);
    config.validate()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

/// Scan and load descriptors, printing load errors as warnings.
///
/// Files that fail to load are skipped; their errors come back alongside
/// the registry of everything that did load.
fn load_descriptors(
    input: &Path,
    filter: Option<&str>,
) -> CliResult<(DescriptorRegistry, Option<LoadError>)> {
    println!("{}", "Scanning for descriptor files...".cyan());

    let mut scanner = DescriptorScanner::new(input);
    if let Some(pattern) = filter {
        scanner = scanner.with_filter(pattern)?;
    }
    let files = scanner.scan_allow_empty()?;
    println!("  Found {} descriptor file(s)", files.len().to_string().green());

    let loaded = DescriptorLoader::new().load(&files);
    if !loaded.errors.is_empty() {
        println!(
            "{} {} file(s) could not be loaded:",
            "Warning:".yellow(),
            loaded.errors.len()
        );
        for error in &loaded.errors {
            println!("  {}", error);
        }
    }
    Ok(loaded.into_parts())
}

/// Generate command implementation.
fn cmd_generate(
    input: &Path,
    config: &Config,
    filter: Option<&str>,
    dry_run: bool,
) -> CliResult<()> {
    let (registry, load_error) = load_descriptors(input, filter)?;
    if registry.is_empty() {
        println!("{}", "No descriptors found.".yellow());
        return load_error.map_or(Ok(()), |e| Err(e.into()));
    }

    let generator = ProjectGenerator::new(config)?;
    println!(
        "{} {} descriptor(s) with {}...",
        "Generating".cyan(),
        registry.len(),
        generator.backend().name()
    );
    let report = generator.generate(&registry);
    report_failures(&report.failures);

    let writer = FileWriter::new(&config.output.dir, dry_run);
    for result in writer.write_all(report.files())? {
        print_write_result(&result);
    }
    println!(
        "  Generated {} file(s)",
        (report.outputs.len() + report.index.len()).to_string().green()
    );

    finish(report, load_error)
}

/// Validate command implementation.
///
/// Provenance is normalised on both sides: expected files are generated
/// without it and it is stripped from the files on disk.
fn cmd_validate(input: &Path, config: &Config) -> CliResult<()> {
    println!("{}", "Validating generated files...".cyan());
    let (registry, load_error) = load_descriptors(input, None)?;

    let generator = ProjectGenerator::new(config)?;
    let report = generator.generate_normalized(&registry);
    report_failures(&report.failures);

    let writer = FileWriter::new(&config.output.dir, false);
    let mut outdated = 0usize;
    for file in report.files() {
        match writer.status(file)? {
            FileStatus::UpToDate(_) => {}
            FileStatus::Stale(path) => {
                outdated += 1;
                println!("  {} {}", "stale".red(), path.display());
            }
            FileStatus::Missing(path) => {
                outdated += 1;
                println!("  {} {}", "missing".red(), path.display());
            }
        }
    }

    if outdated > 0 {
        println!("{} {} file(s) out of date", "✗".red(), outdated);
        println!("  Run 'dtgen generate' to update");
        return Err(CliError::Validation(format!(
            "{} generated file(s) are out of date",
            outdated
        )));
    }

    finish(report, load_error)?;
    println!("{} Generated files are up to date", "✓".green());
    Ok(())
}

/// Support command implementation.
fn cmd_support(config: &Config) -> CliResult<()> {
    let generator = ProjectGenerator::new(config)?;
    println!(
        "{} {} support library...",
        "Rendering".cyan(),
        generator.backend().name()
    );
    let files = generator.support()?;
    let writer = FileWriter::new(&config.output.dir, false);
    for result in writer.write_all(&files)? {
        print_write_result(&result);
    }
    Ok(())
}

/// Check command implementation.
fn cmd_check(input: &Path, config: &Config) -> CliResult<()> {
    let (registry, load_error) = load_descriptors(input, None)?;
    if let Some(error) = load_error {
        return Err(error.into());
    }

    let generator = ProjectGenerator::new(config)?;
    let mismatches = generator.check(&registry);
    if mismatches.is_empty() {
        println!(
            "{} {} descriptor(s) match the support library options",
            "✓".green(),
            registry.len()
        );
        return Ok(());
    }

    for mismatch in &mismatches {
        println!("  {} {}", "✗".red(), mismatch);
    }
    Err(CliError::Mismatch(mismatches))
}

/// Init command implementation.
fn cmd_init(output: &Path, force: bool) -> CliResult<()> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(format!(
            "Configuration file already exists: {}",
            output.display()
        )));
    }

    std::fs::write(output, ConfigManager::default_config_content())?;
    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );
    Ok(())
}

fn report_failures(failures: &[BatchFailure]) {
    for failure in failures {
        let source = failure.source_path.as_deref().unwrap_or("<unknown source>");
        println!("  {} {} ({})", "✗".red(), failure, source.dimmed());
    }
}

fn finish(report: BatchReport, load_error: Option<LoadError>) -> CliResult<()> {
    if !report.is_success() {
        return Err(CliError::Batch(report.failures));
    }
    match load_error {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn print_write_result(result: &WriteResult) {
    match result {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
