// src/pipeline/crawl.rs

//! Site crawling pipeline.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, CrawlOutcome};
use crate::services::{BrowserFetcher, SiteCrawler};

/// Launch a browser session and crawl `base_url` into a corpus.
///
/// The session is closed before this returns.
pub async fn run_crawler(config: Arc<Config>, base_url: &str) -> Result<CrawlOutcome> {
    let crawler = SiteCrawler::new(Arc::clone(&config))?;

    log::info!("Starting crawl of {}", base_url);
    let mut fetcher = BrowserFetcher::launch(&config.crawler).await?;
    let outcome = crawler.crawl(&mut fetcher, base_url).await?;

    let elapsed = outcome.stats.end_time - outcome.stats.start_time;
    log::info!(
        "Crawled {} pages ({} failed) in {}s{}",
        outcome.stats.pages_visited,
        outcome.stats.pages_failed,
        elapsed.num_seconds(),
        if outcome.stats.truncated {
            ", stopped at page cap"
        } else {
            ""
        }
    );

    Ok(outcome)
}
