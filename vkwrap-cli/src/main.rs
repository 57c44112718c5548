//! # vkwrap
//!
//! CLI tool for generating safer C++ wrapper headers from a Vulkan-style
//! API registry document.
//!
//! ## Usage
//!
//! ```bash
//! # Generate the wrapper header from a registry document
//! vkwrap generate --registry vk.json
//!
//! # Generate into a specific output directory
//! vkwrap generate --registry vk.json --output ./include
//!
//! # Watch mode for development
//! vkwrap generate --registry vk.json --watch
//!
//! # Dry run to preview changes
//! vkwrap generate --registry vk.json --dry-run
//!
//! # Initialize configuration
//! vkwrap init
//!
//! # Validate the generated header is up-to-date
//! vkwrap validate --registry vk.json --path ./generated/vkwrap.hpp
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use vkwrap::{Generator, TierCounts};
use vkwrap_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::CliError,
    loader::load_registry,
    watcher::RegistryWatcher,
    writer::{HeaderWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "vkwrap")]
#[command(author, version, about = "Generate safer C++ wrapper structs from a Vulkan-style API registry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the wrapper header from a registry document
    Generate {
        /// Registry document (JSON)
        #[arg(short, long)]
        registry: PathBuf,

        /// Output directory for generated headers
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generated header filename
        #[arg(long)]
        output_file: Option<String>,

        /// Disable the multiple-inclusion guard around the output
        #[arg(long)]
        no_protect: bool,

        /// Watch the registry for changes and regenerate
        #[arg(short, long)]
        watch: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a new vkwrap configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "vkwrap.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate that the generated header is up-to-date
    Validate {
        /// Registry document (JSON)
        #[arg(short, long)]
        registry: PathBuf,

        /// Path to the generated header
        #[arg(short, long)]
        path: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            registry,
            output,
            output_file,
            no_protect,
            watch,
            dry_run,
            config,
        } => {
            let config = ConfigManager::load(config.as_deref())?;
            let config = ConfigManager::merge_cli_args(
                config,
                &CliArgs {
                    output,
                    output_file,
                    protect: no_protect.then_some(false),
                },
            );

            if watch {
                run_watch_mode(&registry, &config, dry_run)
            } else {
                run_generate(&registry, &config, dry_run)
            }
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Validate {
            registry,
            path,
            config,
        } => cmd_validate(&registry, &path, config.as_deref()),
    }
}

/// Load the registry and generate the target in memory.
fn generate_content(registry_path: &Path, config: &Config) -> Result<(String, TierCounts), CliError> {
    let registry = load_registry(registry_path)?;
    let options = config.generator_options()?;
    let target = Generator::new(&registry, options)?.generate()?;
    Ok((target.content, target.counts))
}

/// Run generation once and write the output.
fn run_generate(registry_path: &Path, config: &Config, dry_run: bool) -> Result<(), CliError> {
    println!("{}", "Loading registry...".cyan());
    let (content, counts) = generate_content(registry_path, config)?;

    println!(
        "  Classified {} struct(s)",
        counts.total().to_string().green()
    );

    let output_path = config.output_path();
    let writer = HeaderWriter::new(dry_run);

    match writer.write(&output_path, &content)? {
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

    if config.output.emit_support_header {
        if let WriteResult::Written { path, .. } = writer.write_support_header(&output_path)? {
            println!("{} Written support header to {}", "✓".green(), path.display());
        }
    }

    print_tier_counts(&counts);

    Ok(())
}

/// Run in watch mode, regenerating whenever the registry changes.
fn run_watch_mode(registry_path: &Path, config: &Config, dry_run: bool) -> Result<(), CliError> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", registry_path.display());
    println!("  Press Ctrl+C to stop\n");

    // Initial generation
    run_generate(registry_path, config, dry_run)?;

    let watcher = RegistryWatcher::new(registry_path);
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if event.is_error() {
            println!(
                "{} {}",
                "Watch error:".red(),
                event.error_message().unwrap_or("Unknown error")
            );
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "Registry changed:".cyan(), path.display());
        }

        if let Err(e) = run_generate(registry_path, config, dry_run) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Validate command implementation.
fn cmd_validate(
    registry_path: &Path,
    header_path: &Path,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    println!("{}", "Validating generated header...".cyan());

    if !header_path.exists() {
        return Err(CliError::Validation(format!(
            "Generated header not found: {}",
            header_path.display()
        )));
    }

    let existing_content = std::fs::read_to_string(header_path)?;

    let config = ConfigManager::load(config_path)?;
    let (content, _) = generate_content(registry_path, &config)?;

    if existing_content.trim() == content.trim() {
        println!("{} Generated header is up-to-date", "✓".green());
        Ok(())
    } else {
        println!("{} Generated header is out of date", "✗".red());
        println!("  Run 'vkwrap generate' to update");
        Err(CliError::Validation(
            "Generated header is out of date".to_string(),
        ))
    }
}

/// Print the end-of-run tally of structs per complexity tier.
fn print_tier_counts(counts: &TierCounts) {
    println!("Total trivial structs: {}", counts.trivial);
    println!("Total straightforward structs: {}", counts.straightforward);
    println!("Total complex structs: {}", counts.complex);
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
