//! Page-Mirror main entry point
//!
//! This is the command-line interface for the Page-Mirror chapter mirror.

use clap::Parser;
use page_mirror::config::{load_config_with_hash, validate, Config, Mode};
use page_mirror::crawler::run_mirror;
use page_mirror::output::print_summary;
use page_mirror::AddressTemplate;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Page-Mirror: mirrors chapter/page sites that render in the browser
///
/// Page-Mirror renders every page of a chapter range in headless Chrome and
/// stores the images each page references, or the rendered markup itself,
/// under `<destination>/chapter_<N>/`.
#[derive(Parser, Debug)]
#[command(name = "page-mirror")]
#[command(version)]
#[command(about = "Mirrors dynamically rendered chapter/page sites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the first chapter to mirror
    #[arg(long)]
    start_chapter: Option<u32>,

    /// Override the last chapter to mirror
    #[arg(long)]
    end_chapter: Option<u32>,

    /// Override the destination root folder
    #[arg(short, long, value_name = "DIR")]
    destination: Option<PathBuf>,

    /// Override what gets persisted per page
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Validate config and show which addresses would be mirrored without launching a browser
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(start) = self.start_chapter {
            config.source.start_chapter = start;
        }
        if let Some(end) = self.end_chapter {
            config.source.end_chapter = end;
        }
        if let Some(destination) = &self.destination {
            config.output.destination_root = destination.clone();
        }
        if let Some(mode) = self.mode {
            config.source.mode = mode;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Overrides may break what the file got right
    cli.apply_overrides(&mut config);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid command-line overrides: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_mirror(config).await?;
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
            0 => EnvFilter::new("page_mirror=info,warn"),
            1 => EnvFilter::new("page_mirror=debug,info"),
            2 => EnvFilter::new("page_mirror=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be mirrored
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Page-Mirror Dry Run ===\n");

    println!("Source:");
    println!("  Template: {}", config.source.address_template);
    println!(
        "  Chapters: {}..={}",
        config.source.start_chapter, config.source.end_chapter
    );
    println!("  Mode: {:?}", config.source.mode);
    if let Some(max) = config.source.max_pages {
        println!("  Max pages per chapter: {}", max);
    }

    println!("\nRender:");
    println!("  Browsers: {}", config.render.pool_size);
    println!("  Wait selector: {}", config.wait_selector());
    println!(
        "  Attempts: {} ({}-{}ms backoff)",
        config.render.retry_attempts, config.render.backoff_min_ms, config.render.backoff_max_ms
    );

    println!("\nFetch:");
    println!("  Max concurrent downloads: {}", config.fetch.max_concurrent);
    println!(
        "  Attempts: {} ({}ms backoff)",
        config.fetch.retry_attempts, config.fetch.backoff_ms
    );

    println!("\nOutput:");
    println!("  Destination: {}", config.output.destination_root.display());
    println!(
        "  Chapters at a time: {}",
        config.orchestrator.chapter_concurrency
    );

    let template = AddressTemplate::parse(&config.source.address_template)?;
    println!("\nFirst Pages:");
    for chapter in config.source.start_chapter..=config.source.end_chapter {
        println!("  - {}", template.address(chapter, 1)?);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would mirror {} chapters",
        config.source.end_chapter - config.source.start_chapter + 1
    );

    Ok(())
}

/// Handles the main mirror operation
async fn handle_mirror(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Mirroring {} into {}",
        config.source.address_template,
        config.output.destination_root.display()
    );

    match run_mirror(config).await {
        Ok(summary) => {
            print_summary(&summary);
            if !summary.incomplete().is_empty() {
                tracing::warn!(
                    "{} chapters are incomplete",
                    summary.incomplete().len()
                );
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Mirror failed: {}", e);
            Err(e.into())
        }
    }
}
