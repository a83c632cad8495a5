// src/services/fetcher.rs

//! Rendered page fetching.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Source of rendered page markup.
///
/// One fetcher serves a whole crawl; the crawler calls [`close`] exactly
/// once when it is done, whether or not the crawl succeeded.
///
/// [`close`]: PageFetcher::close
#[async_trait]
pub trait PageFetcher: Send {
    /// Navigate to `url` and return the page source after scripts ran.
    async fn fetch(&mut self, url: &str) -> Result<String>;

    /// Release the underlying session.
    async fn close(&mut self) -> Result<()>;
}

/// Headless Chromium session reused across every page of a crawl.
pub struct BrowserFetcher {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    settle_delay: Duration,
    closed: bool,
}

impl BrowserFetcher {
    /// Launch Chromium and open the tab all pages are rendered in.
    pub async fn launch(config: &CrawlerConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(Duration::from_secs(config.request_timeout_secs))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", config.user_agent));
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder.build().map_err(AppError::browser)?;

        let (mut browser, mut events) = Browser::launch(browser_config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    log::debug!("Browser event loop stopped: {}", e);
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(e.into());
            }
        };

        log::info!("Browser session started ({})", config.user_agent);

        Ok(Self {
            browser,
            page,
            handler,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            closed: false,
        })
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::fetch(url, e))?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        self.page
            .content()
            .await
            .map_err(|e| AppError::fetch(url, e))
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            log::warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        log::info!("Browser session closed");

        closed.map(|_| ()).map_err(AppError::from)
    }
}
