use thiserror::Error;

// * Unified Error type for page fetching (HTTP and rendered paths).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTTP {0} returned for page")]
    Status(u16),

    #[error("Empty response body")]
    EmptyResponse,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("Page navigation failed: {0}")]
    Navigation(String),

    #[error("Page timeout after {0}ms")]
    Timeout(u64),

    #[error("Content extraction failed: {0}")]
    ContentExtraction(String),
}

impl FetchError {
    // * Transient failures are worth another attempt on the same path.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Reqwest(e) => e.is_timeout(),
            FetchError::Status(code) => *code >= 500,
            _ => false,
        }
    }
}
