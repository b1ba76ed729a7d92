//! Quire main entry point
//!
//! This is the command-line interface for the Quire blog archiver.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use quire::config::{load_config_with_hash, validate, Config};
use quire::crawler::{run_archive_listing, run_archive_range};
use quire::export::run_export;
use quire::{PlatformKind, RunReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quire: archive a hosted blog to Markdown and export it as WXR
///
/// `archive` and `archive-list` fetch posts, download their images and write
/// one Markdown record per post. `export` turns the archive into a WordPress
/// import file.
#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(version = "1.0.0")]
#[command(about = "Blog archiver and WXR exporter", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply without one)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Archive directory (overrides archive.output-dir)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Concurrent workers (overrides archive.workers)
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Platform profile (overrides platform.kind)
    #[arg(long, value_enum, global = true)]
    platform: Option<PlatformKind>,

    /// Blog identifier (overrides platform.blog-id)
    #[arg(long, global = true)]
    blog_id: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Validate the configuration and show what would run, without running it
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Archive posts by identifier range
    Archive {
        /// First post identifier
        #[arg(long, default_value_t = 1)]
        start: u64,

        /// Last post identifier (inclusive)
        #[arg(long, default_value_t = 700)]
        end: u64,
    },

    /// Archive the posts of a listing collection
    ArchiveList {
        /// Collection to list (defaults to the blog id)
        #[arg(long)]
        collection: Option<String>,

        /// Archive only the first N listed posts (0 = all)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Export the archive as a WXR document
    Export {
        /// URL serving the images root (overrides export.base-url)
        #[arg(long)]
        base_url: Option<String>,

        /// Output file (overrides export.output-file)
        #[arg(long)]
        out: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        print_dry_run(&config, &cli.command);
        return Ok(());
    }

    match cli.command {
        Command::Archive { start, end } => {
            if start > end {
                bail!("--start ({}) must not exceed --end ({})", start, end);
            }
            let report = run_archive_range(config, start, end)
                .await
                .context("archive run failed")?;
            print_report(&report);
        }
        Command::ArchiveList { collection, limit } => {
            let collection = collection.unwrap_or_else(|| config.platform.blog_id.clone());
            let limit = limit.unwrap_or(config.archive.limit);
            let report = run_archive_listing(config, &collection, limit)
                .await
                .context("listing archive run failed")?;
            print_report(&report);
        }
        Command::Export { .. } => {
            let path = run_export(&config).context("export failed")?;
            println!("✓ Export written to: {}", path.display());
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quire=info,warn"),
            1 => EnvFilter::new("quire=debug,info"),
            2 => EnvFilter::new("quire=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.archive.output_dir = output.clone();
    }
    if let Some(workers) = cli.workers {
        config.archive.workers = workers;
    }
    if let Some(platform) = cli.platform {
        config.platform.kind = platform;
    }
    if let Some(blog_id) = &cli.blog_id {
        config.platform.blog_id = blog_id.clone();
    }
    if let Command::Export { base_url, out } = &cli.command {
        if let Some(base_url) = base_url {
            config.export.base_url = base_url.clone();
        }
        if let Some(out) = out {
            config.export.output_file = out.clone();
        }
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

fn print_report(report: &RunReport) {
    println!(
        "✓ Processed {} posts: {} archived, {} skipped, {} failed",
        report.total(),
        report.archived(),
        report.skipped(),
        report.failed()
    );
}

/// Handles --dry-run: shows the effective configuration
fn print_dry_run(config: &Config, command: &Command) {
    println!("=== Quire Dry Run ===\n");

    println!("Platform:");
    println!("  Kind: {:?}", config.platform.kind);
    println!("  Blog id: {}", config.platform.blog_id);
    if let Some(base_url) = &config.platform.base_url {
        println!("  Base URL: {}", base_url);
    }

    println!("\nArchive:");
    println!("  Output directory: {}", config.archive.output_dir);
    println!("  Images root: {}", config.archive.images_root);
    println!("  Workers: {}", config.archive.workers);

    match command {
        Command::Archive { start, end } => {
            println!("\n✓ Would archive posts {} to {}", start, end);
        }
        Command::ArchiveList { collection, limit } => {
            println!(
                "\n✓ Would list collection {} (limit {})",
                collection.as_deref().unwrap_or(&config.platform.blog_id),
                limit.unwrap_or(config.archive.limit)
            );
        }
        Command::Export { .. } => {
            println!("\nExport:");
            println!("  Base URL: {}", config.export.base_url);
            println!("  Output file: {}", config.export.output_file);
            println!("\n✓ Would export {}", config.archive.output_dir);
        }
    }
}
