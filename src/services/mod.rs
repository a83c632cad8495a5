//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Link scoping (`ScopeFilter`)
//! - Page rendering (`PageFetcher`, `BrowserFetcher`)
//! - Header/nav/footer isolation (`StructuralExtractor`)
//! - The crawl loop (`SiteCrawler`)
//! - Corpus assembly (`assemble`)
//! - Corpus refinement (`Refiner`, `HttpRefiner`)

pub mod corpus;
pub mod crawler;
pub mod extractor;
pub mod fetcher;
pub mod refiner;
pub mod scope;

pub use corpus::{assemble, dedupe_lines};
pub use crawler::SiteCrawler;
pub use extractor::{PageExtract, StructuralExtractor};
pub use fetcher::{BrowserFetcher, PageFetcher};
pub use refiner::{HttpRefiner, Refiner};
pub use scope::{ScopeFilter, is_in_scope};
