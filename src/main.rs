//! Barrio-Scout main entry point
//!
//! This is the command-line interface for the Barrio-Scout business directory crawler.

use anyhow::{bail, Context};
use barrio_scout::config::{load_config_with_hash, Config, StoreBackend};
use barrio_scout::crawler::{run_crawl, search_url};
use barrio_scout::storage::open_store;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Barrio-Scout: a local business directory crawler
///
/// Barrio-Scout searches a map service for one business category per
/// neighbourhood, opens every result, extracts name, address and phone, and
/// stores each business with a valid mobile phone exactly once.
#[derive(Parser, Debug)]
#[command(name = "barrio-scout")]
#[command(version = "1.0.0")]
#[command(about = "A local business directory crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the searches that would run
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the SQLite store and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Secrets may live in a .env next to the config
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
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
            0 => EnvFilter::new("barrio_scout=info,warn"),
            1 => EnvFilter::new("barrio_scout=debug,info"),
            _ => EnvFilter::new("barrio_scout=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the settings and the searches that would run
fn handle_dry_run(config: &Config) {
    println!("=== Barrio-Scout Dry Run ===\n");

    println!("Browser:");
    println!("  Headless: {}", config.browser.headless);
    if let Some(path) = &config.browser.chrome_executable {
        println!("  Executable: {}", path);
    }
    println!("  Navigation timeout: {}ms", config.browser.navigation_timeout);

    let search = &config.search;
    println!("\nSearch:");
    println!("  Base URL: {}", search.base_url);
    println!(
        "  Scroll: {} pulses of {}px ({:?})",
        search.scroll_pulses, search.scroll_step, search.pagination
    );
    println!("  Max cards per location: {}", search.max_cards);
    println!("  Consent labels: {}", search.consent_labels.join(", "));

    println!("\nStore:");
    match config.store.backend {
        StoreBackend::Sqlite => println!(
            "  SQLite: {}",
            config.store.database_path.as_deref().unwrap_or("(unset)")
        ),
        StoreBackend::Supabase => println!(
            "  Supabase table '{}' (key from ${})",
            config.store.table, config.store.api_key_env
        ),
    }

    let tasks = config.location_tasks();
    println!("\nLocations ({}):", tasks.len());
    for task in &tasks {
        println!(
            "  - {} (population {})",
            task.query(&search.connector),
            task.expected_population
        );
        println!("    * {}", search_url(&search.base_url, task, &search.connector));
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would run {} searches", tasks.len());
}

/// Handles the --stats mode: shows statistics from the SQLite store
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use barrio_scout::output::{load_statistics, print_statistics};
    use barrio_scout::storage::SqliteStore;
    use std::path::Path;

    let path = match (config.store.backend, config.store.database_path.as_deref()) {
        (StoreBackend::Sqlite, Some(path)) => path,
        _ => bail!("--stats needs the sqlite store backend with a database-path"),
    };

    println!("Database: {}\n", path);

    let store = SqliteStore::new(Path::new(path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    // Reaching the store is an initialization step; failing it halts the run
    let store = open_store(&config.store)
        .await
        .context("Failed to open the business store")?;

    let summary = run_crawl(config, store)
        .await
        .context("Failed to start the browser")?;

    tracing::info!(
        "Run finished: {} saved, {} duplicates, {} without phone",
        summary.total_saved(),
        summary.total_duplicates(),
        summary.total_no_phone()
    );

    Ok(())
}
