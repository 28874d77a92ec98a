// * Page Fetcher
// * Chooses between the plain HTTP path and the rendered browser path

use serde::Serialize;
use tracing::{info, warn};

use crate::engine::slow_path::BrowserRenderer;
use crate::network::client::HttpFetcher;
use crate::network::errors::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    Http,
    Rendered,
}

#[derive(Debug)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
    pub strategy: FetchStrategy,
}

pub struct PageFetcher {
    http: HttpFetcher,
    renderer: BrowserRenderer,
}

impl PageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpFetcher::new()?,
            renderer: BrowserRenderer::new(),
        })
    }

    pub fn with_parts(http: HttpFetcher, renderer: BrowserRenderer) -> Self {
        Self { http, renderer }
    }

    // * Fetches a page. A browser that cannot be launched degrades to plain HTTP;
    // * any other rendering failure is returned as-is.
    pub async fn fetch(&self, url: &str, strategy: FetchStrategy) -> Result<FetchedPage, FetchError> {
        match strategy {
            FetchStrategy::Http => self.fetch_http(url).await,
            FetchStrategy::Rendered => match self.renderer.render(url).await {
                Ok(rendered) => {
                    info!(url, bytes = rendered.html.len(), "page rendered");
                    Ok(FetchedPage {
                        url: rendered.final_url,
                        html: rendered.html,
                        strategy: FetchStrategy::Rendered,
                    })
                }
                Err(FetchError::BrowserLaunch(reason)) => {
                    warn!(url, %reason, "browser unavailable, falling back to HTTP");
                    self.fetch_http(url).await
                }
                Err(e) => Err(e),
            },
        }
    }

    async fn fetch_http(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let html = self.http.fetch(url).await?;
        info!(url, bytes = html.len(), "page fetched");
        Ok(FetchedPage {
            url: url.to_string(),
            html,
            strategy: FetchStrategy::Http,
        })
    }
}
