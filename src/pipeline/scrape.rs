// src/pipeline/scrape.rs

//! Full scrape pipeline: crawl, refine, store.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, RecordUpdate, ScrapeRequest, ScrapeResponse};
use crate::services::{BrowserFetcher, PageFetcher, Refiner, SiteCrawler};
use crate::storage::RecordStore;

/// Crawl the requested site in a fresh browser session, refine the corpus
/// and store it against the requested record.
pub async fn run_scrape(
    config: Arc<Config>,
    request: &ScrapeRequest,
    refiner: &dyn Refiner,
    store: &dyn RecordStore,
) -> Result<ScrapeResponse> {
    let crawler = SiteCrawler::new(Arc::clone(&config))?;
    let mut fetcher = BrowserFetcher::launch(&config.crawler).await?;
    scrape(&crawler, &mut fetcher, request, refiner, store).await
}

/// Same as [`run_scrape`] with a caller-supplied fetcher.
pub async fn scrape_with<F: PageFetcher>(
    config: Arc<Config>,
    fetcher: &mut F,
    request: &ScrapeRequest,
    refiner: &dyn Refiner,
    store: &dyn RecordStore,
) -> Result<ScrapeResponse> {
    let crawler = SiteCrawler::new(config)?;
    scrape(&crawler, fetcher, request, refiner, store).await
}

async fn scrape<F: PageFetcher>(
    crawler: &SiteCrawler,
    fetcher: &mut F,
    request: &ScrapeRequest,
    refiner: &dyn Refiner,
    store: &dyn RecordStore,
) -> Result<ScrapeResponse> {
    log::info!(
        "Scraping {} for record {}",
        request.url,
        request.community_id
    );

    let outcome = crawler.crawl(fetcher, &request.url).await?;

    let refined = refiner.refine(&outcome.corpus).await?;
    log::info!(
        "Refined corpus: {} -> {} bytes",
        outcome.corpus.len(),
        refined.len()
    );

    let response = store
        .update(request.community_id, &RecordUpdate { corpus: refined })
        .await?;

    Ok(ScrapeResponse::success(response))
}
