// * Slow Path - Headless Browser Rendering
// * Uses ChromiumOxide for pages whose listings only exist after JavaScript runs

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::constants::{BROWSER_SETTLE_MS, PAGE_TIMEOUT_MS, SCROLL_PAUSE_MS};
use crate::network::errors::FetchError;
use crate::network::identity::IdentityProfile;

// * Loads lazily-rendered rows before the DOM is captured
const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight);";

// * Result of slow path rendering
#[derive(Debug)]
pub struct SlowPathResult {
    pub html: String,
    pub final_url: String,
}

// * BrowserRenderer launches one headless browser per render and closes it afterwards
#[derive(Debug, Clone)]
pub struct BrowserRenderer {
    page_timeout: Duration,
    settle: Duration,
    scroll_pause: Duration,
}

impl BrowserRenderer {
    pub fn new() -> Self {
        Self {
            page_timeout: Duration::from_millis(PAGE_TIMEOUT_MS),
            settle: Duration::from_millis(BROWSER_SETTLE_MS),
            scroll_pause: Duration::from_millis(SCROLL_PAUSE_MS),
        }
    }

    fn browser_config(url: &str) -> Result<BrowserConfig, FetchError> {
        let identity = IdentityProfile::for_url(url);
        BrowserConfig::builder()
            .no_sandbox()
            .window_size(1920, 1080)
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--ignore-certificate-errors")
            .arg("--ignore-ssl-errors")
            .arg(format!("--user-agent={}", identity.user_agent))
            .build()
            .map_err(FetchError::BrowserLaunch)
    }

    // * Renders a page and returns the final HTML
    pub async fn render(&self, url: &str) -> Result<SlowPathResult, FetchError> {
        let config = Self::browser_config(url)?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::BrowserLaunch(e.to_string()))?;

        // * Spawn handler in background
        let handle = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // * Process browser events
            }
        });
        info!("Browser launched for {}", url);

        let result = self.render_in(&browser, url).await;

        if let Err(e) = browser.close().await {
            debug!("Browser close failed: {}", e);
        }
        handle.abort();

        result
    }

    async fn render_in(&self, browser: &Browser, url: &str) -> Result<SlowPathResult, FetchError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Navigation(e.to_string()))?;

        // * Navigate with timeout
        let timeout_ms = self.page_timeout.as_millis() as u64;
        match tokio::time::timeout(self.page_timeout, Self::navigate(&page, url)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(FetchError::Timeout(timeout_ms)),
        }

        // * Wait for page to settle, then one scroll step for lazy content
        tokio::time::sleep(self.settle).await;
        page.evaluate(SCROLL_TO_BOTTOM_JS)
            .await
            .map_err(|e| FetchError::ContentExtraction(e.to_string()))?;
        tokio::time::sleep(self.scroll_pause).await;

        // * Get final URL after redirects
        let final_url = page
            .url()
            .await
            .map_err(|e| FetchError::ContentExtraction(e.to_string()))?
            .unwrap_or_else(|| url.to_string());

        let html = page
            .content()
            .await
            .map_err(|e| FetchError::ContentExtraction(e.to_string()))?;

        if let Err(e) = page.close().await {
            debug!("Page close failed: {}", e);
        }

        Ok(SlowPathResult { html, final_url })
    }

    async fn navigate(page: &Page, url: &str) -> Result<(), FetchError> {
        page.goto(url)
            .await
            .map_err(|e| FetchError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| FetchError::Navigation(e.to_string()))?;
        Ok(())
    }
}

impl Default for BrowserRenderer {
    fn default() -> Self {
        Self::new()
    }
}
