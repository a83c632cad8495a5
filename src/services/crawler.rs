// src/services/crawler.rs

//! Site crawler service.
//!
//! Breadth-first walk over one site, bounded by the scope filter and a page
//! cap. Pages are fetched one at a time through a single [`PageFetcher`].

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use chrono::Utc;
use url::Url;

use crate::error::Result;
use crate::models::{Config, CrawlOutcome, CrawlStats, StructuralSlots};
use crate::services::corpus::assemble;
use crate::services::extractor::StructuralExtractor;
use crate::services::fetcher::PageFetcher;
use crate::services::scope::ScopeFilter;
use crate::utils::url::normalize_base;

/// FIFO of URLs to visit plus everything already visited, queued or failed.
#[derive(Debug, Default)]
struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    failed: HashSet<String>,
}

impl Frontier {
    fn seeded(url: String) -> Self {
        let mut frontier = Self::default();
        frontier.push(url);
        frontier
    }

    /// Queue `url` unless it was visited, failed or is already waiting.
    fn push(&mut self, url: String) -> bool {
        if self.visited.contains(&url)
            || self.failed.contains(&url)
            || !self.queued.insert(url.clone())
        {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    fn mark_visited(&mut self, url: String) {
        self.visited.insert(url);
    }

    /// Failed URLs are never retried but do not count as visited.
    fn mark_failed(&mut self, url: String) {
        self.failed.insert(url);
    }

    fn visited_count(&self) -> usize {
        self.visited.len()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Service that turns a base URL into a deduplicated text corpus.
pub struct SiteCrawler {
    config: Arc<Config>,
    extractor: StructuralExtractor,
}

impl SiteCrawler {
    /// Create a new site crawler with the given configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Ok(Self {
            config,
            extractor: StructuralExtractor::new()?,
        })
    }

    /// Crawl everything in scope under `base_url`.
    ///
    /// Pages that fail to load are logged and dropped. `fetcher` is closed
    /// before this returns, on success and on error alike.
    pub async fn crawl<F: PageFetcher>(
        &self,
        fetcher: &mut F,
        base_url: &str,
    ) -> Result<CrawlOutcome> {
        let result = self.run(fetcher, base_url).await;

        if let Err(e) = fetcher.close().await {
            log::warn!("Failed to close page fetcher: {}", e);
        }

        result
    }

    async fn run<F: PageFetcher>(&self, fetcher: &mut F, base_url: &str) -> Result<CrawlOutcome> {
        let start_time = Utc::now();
        let base = normalize_base(base_url)?;
        let scope = ScopeFilter::new(base.clone(), &self.config.scope);
        let max_pages = self.config.crawler.max_pages.max(1);

        let mut frontier = Frontier::seeded(base.clone());
        let mut slots = StructuralSlots::new();
        let mut page_texts = Vec::new();
        let mut pages_failed = 0;

        while let Some(url) = frontier.pop() {
            if frontier.visited_count() >= max_pages {
                log::warn!(
                    "Page cap of {} reached; {} queued URLs left unvisited",
                    max_pages,
                    frontier.queue.len() + 1
                );
                frontier.push(url);
                break;
            }

            log::info!("Crawling: {}", url);
            let source = match fetcher.fetch(&url).await {
                Ok(source) => source,
                Err(e) => {
                    pages_failed += 1;
                    log::warn!("Error crawling {}: {}", url, e);
                    frontier.mark_failed(url);
                    continue;
                }
            };

            let page_url = match Url::parse(&url) {
                Ok(page_url) => page_url,
                Err(e) => {
                    pages_failed += 1;
                    log::warn!("Skipping unparseable URL {}: {}", url, e);
                    frontier.mark_failed(url);
                    continue;
                }
            };
            frontier.mark_visited(url);

            let page = self.extractor.extract(&source, &page_url, &mut slots);
            page_texts.push(page.body_text);

            let mut queued = 0;
            for link in page.links {
                if scope.allows(&link) && frontier.push(link) {
                    queued += 1;
                }
            }
            log::debug!("{} new in-scope links from {}", queued, page_url);
        }

        let truncated = !frontier.is_empty();
        let corpus = assemble(&slots, &page_texts);

        let stats = CrawlStats {
            base_url: base,
            start_time,
            end_time: Utc::now(),
            pages_visited: frontier.visited_count(),
            pages_failed,
            truncated,
        };

        log::info!(
            "Crawl of {} finished: {} pages, {} failed, {} corpus bytes",
            stats.base_url,
            stats.pages_visited,
            stats.pages_failed,
            corpus.len()
        );

        Ok(CrawlOutcome { corpus, stats })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;

    /// In-memory site: URL → page source. Unknown URLs fail to load.
    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, String>,
        fetched: Vec<String>,
        close_calls: usize,
    }

    impl FakeSite {
        fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn fetch(&mut self, url: &str) -> Result<String> {
            self.fetched.push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| AppError::fetch(url, "net::ERR_NAME_NOT_RESOLVED"))
        }

        async fn close(&mut self) -> Result<()> {
            self.close_calls += 1;
            Ok(())
        }
    }

    fn crawler() -> SiteCrawler {
        SiteCrawler::new(Arc::new(Config::default())).unwrap()
    }

    fn crawler_with_cap(max_pages: usize) -> SiteCrawler {
        let mut config = Config::default();
        config.crawler.max_pages = max_pages;
        SiteCrawler::new(Arc::new(config)).unwrap()
    }

    #[tokio::test]
    async fn crawls_in_scope_pages_only() {
        let mut site = FakeSite::default()
            .page(
                "http://site.com/",
                r#"<body><p>Home Page</p>
                   <a href="/about.html">About</a>
                   <a href="/terms-of-service.html">Terms</a></body>"#,
            )
            .page("http://site.com/about.html", "<body><p>About Us</p></body>")
            .page(
                "http://site.com/terms-of-service.html",
                "<body><p>Legal text</p></body>",
            );

        let outcome = crawler().crawl(&mut site, "http://site.com").await.unwrap();

        assert_eq!(
            site.fetched,
            vec!["http://site.com/", "http://site.com/about.html"]
        );
        assert!(outcome.corpus.contains("home page"));
        assert!(outcome.corpus.contains("about us"));
        assert!(!outcome.corpus.contains("legal"));
        assert_eq!(outcome.stats.pages_visited, 2);
        assert!(!outcome.stats.truncated);
    }

    #[tokio::test]
    async fn page_linked_twice_is_fetched_once() {
        let mut site = FakeSite::default()
            .page(
                "http://site.com/",
                r#"<a href="a.html">A</a><a href="b.html">B</a><a href="/">Home</a>"#,
            )
            .page("http://site.com/a.html", r#"<a href="b.html">B</a>"#)
            .page("http://site.com/b.html", r#"<a href="a.html">A</a>"#);

        crawler().crawl(&mut site, "http://site.com/").await.unwrap();

        assert_eq!(
            site.fetched,
            vec![
                "http://site.com/",
                "http://site.com/a.html",
                "http://site.com/b.html"
            ]
        );
    }

    #[tokio::test]
    async fn footer_comes_from_first_page_only() {
        let mut site = FakeSite::default()
            .page(
                "http://site.com/",
                r#"<p>Home</p><a href="next.html">n</a><footer>First Footer</footer>"#,
            )
            .page(
                "http://site.com/next.html",
                "<p>Next</p><footer>Second Footer</footer>",
            );

        let outcome = crawler().crawl(&mut site, "http://site.com/").await.unwrap();

        assert!(outcome.corpus.starts_with("first footer\n"));
        assert!(!outcome.corpus.contains("second footer"));
    }

    #[tokio::test]
    async fn failed_page_is_dropped_and_crawl_continues() {
        let mut site = FakeSite::default()
            .page(
                "http://site.com/",
                r#"<p>Home</p><a href="missing.html">x</a><a href="ok.html">y</a>"#,
            )
            .page("http://site.com/ok.html", "<p>Still Here</p>");

        let outcome = crawler().crawl(&mut site, "http://site.com/").await.unwrap();

        assert_eq!(site.fetched.len(), 3);
        assert_eq!(outcome.stats.pages_failed, 1);
        assert_eq!(outcome.stats.pages_visited, 2);
        assert!(outcome.corpus.contains("still here"));
    }

    #[tokio::test]
    async fn failed_page_is_not_fetched_again() {
        let mut site = FakeSite::default()
            .page(
                "http://site.com/",
                r#"<p>Home</p><a href="missing.html">x</a><a href="ok.html">y</a>"#,
            )
            .page(
                "http://site.com/ok.html",
                r#"<p>Ok</p><a href="missing.html">again</a>"#,
            );

        let outcome = crawler().crawl(&mut site, "http://site.com/").await.unwrap();

        assert_eq!(
            site.fetched,
            vec![
                "http://site.com/".to_string(),
                "http://site.com/missing.html".to_string(),
                "http://site.com/ok.html".to_string(),
            ]
        );
        assert_eq!(outcome.stats.pages_failed, 1);
        assert_eq!(outcome.stats.pages_visited, 2);
    }

    #[tokio::test]
    async fn repeated_lines_across_pages_appear_once() {
        let mut site = FakeSite::default()
            .page(
                "http://site.com/",
                r#"<p>Shared Line</p><p>Home</p><a href="a.html">a</a>"#,
            )
            .page("http://site.com/a.html", "<p>Shared Line</p><p>Other</p>");

        let outcome = crawler().crawl(&mut site, "http://site.com/").await.unwrap();

        assert_eq!(outcome.corpus.matches("shared line").count(), 1);
        assert!(outcome.corpus.contains("other"));
    }

    #[tokio::test]
    async fn page_cap_stops_crawl() {
        let mut site = FakeSite::default()
            .page(
                "http://site.com/",
                r#"<a href="1.html">1</a><a href="2.html">2</a><a href="3.html">3</a>"#,
            )
            .page("http://site.com/1.html", "<p>one</p>")
            .page("http://site.com/2.html", "<p>two</p>")
            .page("http://site.com/3.html", "<p>three</p>");

        let outcome = crawler_with_cap(2)
            .crawl(&mut site, "http://site.com/")
            .await
            .unwrap();

        assert_eq!(site.fetched.len(), 2);
        assert_eq!(outcome.stats.pages_visited, 2);
        assert!(outcome.stats.truncated);
    }

    #[tokio::test]
    async fn fetcher_is_closed_once() {
        let mut site = FakeSite::default().page("http://site.com/", "<p>x</p>");
        crawler().crawl(&mut site, "http://site.com/").await.unwrap();
        assert_eq!(site.close_calls, 1);
    }

    #[tokio::test]
    async fn invalid_base_url_fails_but_still_closes() {
        let mut site = FakeSite::default();
        let result = crawler().crawl(&mut site, "not a url").await;

        assert!(matches!(result, Err(AppError::Url(_))));
        assert!(site.fetched.is_empty());
        assert_eq!(site.close_calls, 1);
    }

    #[tokio::test]
    async fn unreachable_site_yields_empty_corpus() {
        let mut site = FakeSite::default();
        let outcome = crawler().crawl(&mut site, "http://site.com/").await.unwrap();

        assert_eq!(outcome.corpus, "");
        assert_eq!(outcome.stats.pages_visited, 0);
        assert_eq!(outcome.stats.pages_failed, 1);
    }
}
