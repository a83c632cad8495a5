// src/models/crawl.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Page regions that repeat across a site and are kept only once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralTag {
    Header,
    Nav,
    Footer,
}

impl StructuralTag {
    /// Processing and corpus order.
    pub const ALL: [StructuralTag; 3] = [Self::Header, Self::Nav, Self::Footer];

    /// HTML element name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Nav => "nav",
            Self::Footer => "footer",
        }
    }
}

/// Header, nav and footer text, each captured from the first page that has it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralSlots {
    header: Option<String>,
    nav: Option<String>,
    footer: Option<String>,
}

impl StructuralSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tag: StructuralTag) -> Option<&str> {
        self.slot(tag).as_deref()
    }

    pub fn is_filled(&self, tag: StructuralTag) -> bool {
        self.slot(tag).is_some()
    }

    /// Store `text` in an empty slot.
    ///
    /// Returns `false` and leaves the slot untouched when it is already
    /// filled or `text` is empty.
    pub fn fill(&mut self, tag: StructuralTag, text: String) -> bool {
        let slot = self.slot_mut(tag);
        if slot.is_some() || text.is_empty() {
            return false;
        }
        *slot = Some(text);
        true
    }

    /// Filled slot texts in header, nav, footer order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        StructuralTag::ALL.into_iter().filter_map(|tag| self.get(tag))
    }

    fn slot(&self, tag: StructuralTag) -> &Option<String> {
        match tag {
            StructuralTag::Header => &self.header,
            StructuralTag::Nav => &self.nav,
            StructuralTag::Footer => &self.footer,
        }
    }

    fn slot_mut(&mut self, tag: StructuralTag) -> &mut Option<String> {
        match tag {
            StructuralTag::Header => &mut self.header,
            StructuralTag::Nav => &mut self.nav,
            StructuralTag::Footer => &mut self.footer,
        }
    }
}

/// Counters for a finished crawl.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub base_url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub pages_visited: usize,
    pub pages_failed: usize,
    /// The page cap stopped the crawl before the frontier emptied
    pub truncated: bool,
}

/// Assembled corpus plus the stats of the crawl that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub corpus: String,
    pub stats: CrawlStats,
}
