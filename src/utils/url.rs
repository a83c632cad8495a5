// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

use crate::error::Result;

/// Resolve a potentially relative href against the page it appeared on.
///
/// Returns `None` for hrefs that cannot be joined (e.g. malformed schemes).
///
/// # Examples
/// ```
/// use site_corpus::utils::url::resolve;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/path/").unwrap();
/// assert_eq!(
///     resolve(&page, "page.html").as_deref(),
///     Some("https://example.com/path/page.html")
/// );
/// ```
pub fn resolve(page: &Url, href: &str) -> Option<String> {
    page.join(href.trim()).ok().map(String::from)
}

/// Canonical string form of a crawl root.
///
/// `https://Site.com` becomes `https://site.com/`, matching the form links
/// take once resolved, so the seed and rediscovered links compare equal.
pub fn normalize_base(raw: &str) -> Result<String> {
    Ok(Url::parse(raw.trim())?.to_string())
}
