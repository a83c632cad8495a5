// src/services/extractor.rs

//! Structural text extraction.
//!
//! Splits a rendered page into the site chrome (header, nav, footer), which
//! is captured once per crawl, and the page body, which is captured for
//! every page.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{StructuralSlots, StructuralTag};
use crate::utils::text::{collapse_line_breaks, normalize};
use crate::utils::url::resolve;

/// Elements whose text is code or styling, not readable content.
const NON_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "template", "noscript"];

/// What one page contributed to the crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtract {
    /// Normalized text left after structural regions are removed
    pub body_text: String,
    /// Absolute hrefs of every anchor on the page, in document order
    pub links: Vec<String>,
}

/// Parses page sources and separates structural regions from body text.
pub struct StructuralExtractor {
    anchors: Selector,
    structural: Vec<(StructuralTag, Selector)>,
}

impl StructuralExtractor {
    pub fn new() -> Result<Self> {
        let structural = StructuralTag::ALL
            .into_iter()
            .map(|tag| Ok((tag, Self::parse_selector(tag.as_str())?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            anchors: Self::parse_selector("a[href]")?,
            structural,
        })
    }

    /// Extract body text and links from `page_source`, filling any empty
    /// slot in `slots` from this page's structural regions.
    pub fn extract(
        &self,
        page_source: &str,
        page_url: &Url,
        slots: &mut StructuralSlots,
    ) -> PageExtract {
        let mut document = Html::parse_document(page_source);
        let links = self.collect_links(&document, page_url);

        for (tag, selector) in &self.structural {
            // Search from the root so regions detached earlier (and anything
            // nested inside them) are no longer found.
            let Some(element) = document.root_element().select(selector).next() else {
                continue;
            };
            let node_id = element.id();

            if !slots.is_filled(*tag) {
                let text = joined_text(element, true);
                if slots.fill(*tag, normalize(text.trim())) {
                    log::debug!("Captured <{}> from {}", tag.as_str(), page_url);
                }
            }

            if let Some(mut node) = document.tree.get_mut(node_id) {
                node.detach();
            }
        }

        let remaining = joined_text(document.root_element(), false);
        let body_text = normalize(&collapse_line_breaks(remaining.trim()));

        PageExtract { body_text, links }
    }

    fn collect_links(&self, document: &Html, page_url: &Url) -> Vec<String> {
        document
            .root_element()
            .select(&self.anchors)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| resolve(page_url, href))
            .collect()
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

/// Text nodes under `element` joined by line breaks.
///
/// With `trim_nodes`, each node is trimmed and blank nodes are dropped.
fn joined_text(element: ElementRef<'_>, trim_nodes: bool) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_TEXT_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let text: &str = text;
        if trim_nodes {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        } else {
            parts.push(text);
        }
    }

    parts.join("\n")
}
