//! Site corpus CLI
//!
//! Local execution entry point. For AWS Lambda, use `site-corpus-lambda`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use site_corpus::{
    error::Result,
    models::{Config, ScrapeRequest},
    pipeline,
    services::HttpRefiner,
    storage::{LocalRecordStore, RecordStore, SupabaseStore},
};

/// site-corpus - Single-site text corpus crawler
#[derive(Parser, Debug)]
#[command(
    name = "site-corpus",
    version,
    about = "Crawl a website into a deduplicated text corpus"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory used by the local record store
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and print or save the raw corpus
    Crawl {
        /// Base URL; only pages under it are visited
        url: String,

        /// Write the corpus here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Crawl, refine and store the corpus for a record
    Scrape {
        /// Base URL; only pages under it are visited
        url: String,

        /// Record that receives the refined corpus
        #[arg(long)]
        community_id: i64,

        /// Store into {storage_dir}/records instead of the remote store
        #[arg(long)]
        local: bool,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load configuration
    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Crawl { url, output } => {
            config.validate()?;
            let outcome = pipeline::run_crawler(Arc::new(config), &url).await?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &outcome.corpus)?;
                    log::info!("Corpus saved to {}", path.display());
                }
                None => println!("{}", outcome.corpus),
            }
        }

        Command::Scrape {
            url,
            community_id,
            local,
        } => {
            config.validate()?;
            let config = Arc::new(config);
            let refiner = HttpRefiner::new(&config.refine)?;
            let store: Box<dyn RecordStore> = if local {
                Box::new(LocalRecordStore::new(&cli.storage_dir, &config.store.column))
            } else {
                Box::new(SupabaseStore::new(&config.store)?)
            };

            let request = ScrapeRequest { url, community_id };
            let response =
                pipeline::run_scrape(Arc::clone(&config), &request, &refiner, store.as_ref())
                    .await?;

            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            if config.store.is_remote_configured() {
                log::info!("✓ Remote store configured ({})", config.store.url);
            } else {
                log::warn!("Remote store not configured; only `scrape --local` will work");
            }
        }
    }

    Ok(())
}
