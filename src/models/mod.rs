// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod crawl;
mod request;

// Re-export all public types
pub use config::{Config, CrawlerConfig, RefineConfig, ScopeConfig, StoreConfig};
pub use crawl::{CrawlOutcome, CrawlStats, StructuralSlots, StructuralTag};
pub use request::{RecordUpdate, ScrapeRequest, ScrapeResponse};
