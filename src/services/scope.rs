// src/services/scope.rs

//! Same-site scope rules for discovered links.

use url::Url;

use crate::models::ScopeConfig;

/// Decides which discovered URLs may join the frontier.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    base_url: String,
    exclude_keywords: Vec<String>,
}

impl ScopeFilter {
    /// Filter for `base_url` using the configured exclusion vocabulary.
    pub fn new(base_url: impl Into<String>, config: &ScopeConfig) -> Self {
        Self {
            base_url: base_url.into(),
            exclude_keywords: config
                .exclude_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A candidate is in scope when it sits under the base URL, carries no
    /// fragment, names a directory or an `.html` page, and its path avoids
    /// every excluded keyword.
    pub fn allows(&self, candidate: &str) -> bool {
        if !candidate.starts_with(&self.base_url) {
            return false;
        }
        let Ok(parsed) = Url::parse(candidate) else {
            return false;
        };
        if parsed.fragment().is_some() {
            return false;
        }

        let path = parsed.path().to_lowercase();
        let page_shaped = path.ends_with('/') || path.ends_with(".html");
        page_shaped && !self.exclude_keywords.iter().any(|k| path.contains(k.as_str()))
    }
}

/// [`ScopeFilter::allows`] with the default exclusion vocabulary.
pub fn is_in_scope(candidate: &str, base_url: &str) -> bool {
    ScopeFilter::new(base_url, &ScopeConfig::default()).allows(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://site.com";

    #[test]
    fn accepts_html_page_under_base() {
        assert!(is_in_scope("http://site.com/about.html", BASE));
        assert!(is_in_scope("http://site.com/floor-plans/", BASE));
    }

    #[test]
    fn rejects_other_origins() {
        assert!(!is_in_scope("http://other.com/about.html", BASE));
        assert!(!is_in_scope("https://site.com/about.html", BASE));
        assert!(!is_in_scope(
            "http://site.com/about.html",
            "http://site.com/blog/"
        ));
    }

    #[test]
    fn rejects_fragments() {
        assert!(!is_in_scope("http://site.com/about.html#team", BASE));
        assert!(!is_in_scope("http://site.com/#", BASE));
    }

    #[test]
    fn rejects_non_page_paths() {
        assert!(!is_in_scope("http://site.com/blog?id=2", BASE));
        assert!(!is_in_scope("http://site.com/brochure.pdf", BASE));
        assert!(!is_in_scope("http://site.com/logo.png", BASE));
    }

    #[test]
    fn query_does_not_hide_path_shape() {
        assert!(is_in_scope("http://site.com/gallery/?page=2", BASE));
    }

    #[test]
    fn rejects_legal_pages_case_insensitively() {
        assert!(!is_in_scope("http://site.com/privacy-policy/", BASE));
        assert!(!is_in_scope("http://site.com/Terms-Of-Service.html", BASE));
        assert!(!is_in_scope("http://site.com/ACCESSIBILITY/", BASE));
        assert!(!is_in_scope("http://site.com/legal/cookies.html", BASE));
    }

    #[test]
    fn custom_vocabulary_replaces_default() {
        let config = ScopeConfig {
            exclude_keywords: vec!["Careers".to_string()],
        };
        let filter = ScopeFilter::new(BASE, &config);
        assert!(!filter.allows("http://site.com/careers/"));
        assert!(filter.allows("http://site.com/privacy.html"));
    }

    #[test]
    fn unparseable_candidate_is_out_of_scope() {
        assert!(!is_in_scope("http://site.com:notaport/a.html", BASE));
    }
}
