//! flake8-tracker CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flake8_tracker::{
    error::Result,
    models::{Config, RunClock},
    pipeline::{self, DispatchMode},
    services::{Credentials, PypiClient, TwitterPublisher},
    storage::{HistoryLedger, LocalStorage, TrackerStorage},
};

/// flake8-tracker - flake8 plugin release tracker
#[derive(Parser, Debug)]
#[command(
    name = "flake8-tracker",
    version,
    about = "Tracks flake8 plugins on PyPI and announces releases"
)]
struct Cli {
    /// Directory holding config.toml and the data artifacts
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the index listing and save the tracked package names
    List,

    /// Flag tracked packages whose published version is ahead of the snapshot
    Versions,

    /// Announce new and updated packages and update the ledger
    Announce {
        /// Actually post the announcements (default is a dry run)
        #[arg(long)]
        post: bool,
    },

    /// Report entry point names that are not error-code prefixes
    EntryPoints,

    /// Validate configuration file
    Validate,

    /// Show ledger info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let clock = RunClock::now();
    let config_path = cli.data_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    log::info!(
        "Run started at {}, data directory {}",
        clock.instant().to_rfc3339(),
        cli.data_dir.display()
    );

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let storage = LocalStorage::new(&cli.data_dir);

    match cli.command {
        Command::List => {
            let index = PypiClient::from_config(&config)?;
            let tracked = pipeline::run_listing(&config, &storage, &index).await?;
            log::info!("Tracking {} packages", tracked.len());
        }

        Command::Versions => {
            let index = PypiClient::from_config(&config)?;
            let outdated = pipeline::run_version_check(&config, &storage, &index).await?;
            log::info!("{} packages need a refresh", outdated.len());
        }

        Command::Announce { post } => {
            let credentials = Credentials::from_env()?;
            let publisher = TwitterPublisher::from_config(&config, credentials)?;
            let mode = DispatchMode::from_post_flag(post);

            let summary =
                pipeline::run_announce(&config, &storage, &publisher, &clock, mode).await?;
            log::info!(
                "Announced {} packages ({} new, {} updated); dropped {} stale entries; ledger holds {}",
                summary.dispatch.total(),
                summary.new_count,
                summary.updated_count,
                summary.dropped_count,
                summary.ledger_size
            );
        }

        Command::EntryPoints => {
            pipeline::run_entry_point_check(&storage).await?;
        }

        Command::Validate => {
            log::info!("✓ Config OK ({})", config_path.display());
        }

        Command::Info => {
            let ledger = HistoryLedger::load(&storage, config.ledger.clone()).await?;
            log::info!(
                "Ledger: {} entries (max {}, max age {} days)",
                ledger.len(),
                config.ledger.max_entries,
                config.ledger.max_age_days
            );
            if let Some(last) = ledger.entries().last() {
                log::info!(
                    "Last announcement: {} v{} ({}) at {}",
                    last.name,
                    last.version,
                    last.status,
                    last.recorded_at()
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| last.timestamp.to_string())
                );
            }

            let tracked = storage.read_names(flake8_tracker::storage::LIST_FILE).await;
            match tracked {
                Ok(names) => log::info!("Tracked packages: {}", names.len()),
                Err(_) => log::info!("No package listing found yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
