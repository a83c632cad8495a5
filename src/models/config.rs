//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Browser and crawl loop settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Which discovered links are eligible for crawling
    #[serde(default)]
    pub scope: ScopeConfig,

    /// Refinement service endpoint and prompt
    #[serde(default)]
    pub refine: RefineConfig,

    /// Record store connection
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override settings from environment variables when present.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SUPABASE_URL") {
            self.store.url = url;
        }
        if let Some(key) = var("SUPABASE_KEY") {
            self.store.api_key = key;
        }
        if let Some(endpoint) = var("REFINE_ENDPOINT") {
            self.refine.endpoint = endpoint;
        }
        if let Some(path) = var("CHROME_EXECUTABLE") {
            self.crawler.chrome_executable = Some(path);
        }
        if let Some(n) = var("MAX_PAGES").and_then(|v| v.parse().ok()) {
            self.crawler.max_pages = n;
        }
        if let Some(ms) = var("SETTLE_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.crawler.settle_delay_ms = ms;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.max_pages == 0 {
            return Err(AppError::validation("crawler.max_pages must be > 0"));
        }
        if self.crawler.request_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.request_timeout_secs must be > 0",
            ));
        }
        if self
            .scope
            .exclude_keywords
            .iter()
            .any(|k| k.trim().is_empty())
        {
            return Err(AppError::validation(
                "scope.exclude_keywords contains an empty keyword",
            ));
        }
        url::Url::parse(&self.refine.endpoint)
            .map_err(|e| AppError::validation(format!("refine.endpoint: {e}")))?;
        if self.refine.timeout_secs == 0 {
            return Err(AppError::validation("refine.timeout_secs must be > 0"));
        }
        if self.store.table.trim().is_empty() || self.store.column.trim().is_empty() {
            return Err(AppError::validation("store.table and store.column are required"));
        }
        Ok(())
    }
}

/// Headless browser and crawl loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent the browser identifies with
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Wait after navigation so client-side rendering can finish
    #[serde(default = "defaults::settle_delay")]
    pub settle_delay_ms: u64,

    /// Hard cap on pages fetched in one crawl
    #[serde(default = "defaults::max_pages")]
    pub max_pages: usize,

    /// Run Chromium without a window
    #[serde(default = "defaults::headless")]
    pub headless: bool,

    /// Explicit Chromium binary; autodetected when unset
    #[serde(default)]
    pub chrome_executable: Option<String>,

    /// Timeout for a single browser protocol request
    #[serde(default = "defaults::request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            settle_delay_ms: defaults::settle_delay(),
            max_pages: defaults::max_pages(),
            headless: defaults::headless(),
            chrome_executable: None,
            request_timeout_secs: defaults::request_timeout(),
        }
    }
}

/// Link eligibility rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Path substrings that mark boilerplate legal pages
    #[serde(default = "defaults::exclude_keywords")]
    pub exclude_keywords: Vec<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            exclude_keywords: defaults::exclude_keywords(),
        }
    }
}

/// Refinement service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineConfig {
    #[serde(default = "defaults::refine_endpoint")]
    pub endpoint: String,

    /// Instruction prepended to the corpus
    #[serde(default = "defaults::refine_prompt")]
    pub prompt: String,

    #[serde(default = "defaults::refine_timeout")]
    pub timeout_secs: u64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::refine_endpoint(),
            prompt: defaults::refine_prompt(),
            timeout_secs: defaults::refine_timeout(),
        }
    }
}

/// Record store (PostgREST) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,

    /// Service role key
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "defaults::store_table")]
    pub table: String,

    /// JSON column the `{ corpus }` object is written into
    #[serde(default = "defaults::store_column")]
    pub column: String,

    #[serde(default = "defaults::store_timeout")]
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Whether a remote store can be contacted at all.
    pub fn is_remote_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: defaults::store_table(),
            column: defaults::store_column(),
            timeout_secs: defaults::store_timeout(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "insomnia/9.3.3".into()
    }
    pub fn settle_delay() -> u64 {
        2000
    }
    pub fn max_pages() -> usize {
        500
    }
    pub fn headless() -> bool {
        true
    }
    pub fn request_timeout() -> u64 {
        30
    }

    // Scope defaults
    pub fn exclude_keywords() -> Vec<String> {
        [
            "privacy",
            "policy",
            "terms",
            "service",
            "accessibility",
            "cookies",
            "legal",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    // Refinement defaults
    pub fn refine_endpoint() -> String {
        "https://tour.video/api/ai/completion".into()
    }
    pub fn refine_prompt() -> String {
        "Strip all unnecessary text that doesnt give useful information for this apartment \
         property. Return only plain text. Simply remove unnecessary lines. Make sure to \
         include all relevant detail from the initial text:\n"
            .into()
    }
    pub fn refine_timeout() -> u64 {
        120
    }

    // Store defaults
    pub fn store_table() -> String {
        "Community".into()
    }
    pub fn store_column() -> String {
        "ai".into()
    }
    pub fn store_timeout() -> u64 {
        30
    }
}
