//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Crawl a site into a deduplicated corpus
//! - `run_scrape`: Crawl, refine and store the result against a record

pub mod crawl;
pub mod scrape;

pub use crawl::run_crawler;
pub use scrape::{run_scrape, scrape_with};
