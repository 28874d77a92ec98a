use crate::config::constants::{MAX_RETRIES, REQUEST_TIMEOUT_SECS, RETRY_DELAY_MS};
use crate::network::errors::FetchError;
use crate::network::identity::IdentityProfile;
use reqwest::Client;
use std::time::Duration;
use tracing::warn;
use url::Url;

// * Plain HTTP page fetcher.
// * Keeps a second client with certificate verification disabled for sites
// * whose TLS setup is broken; it is only used after the verified attempt
// * fails to connect.
pub struct HttpFetcher {
    verified: Client,
    unverified: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            verified: Self::build_client(false)?,
            unverified: Self::build_client(true)?,
            max_retries: MAX_RETRIES,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        })
    }

    // * Overrides the transient-failure retry policy.
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay = retry_delay;
        self
    }

    fn build_client(accept_invalid_certs: bool) -> Result<Client, FetchError> {
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(client)
    }

    // * Fetches a URL, retrying transient failures.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        let mut attempt = 1;
        loop {
            match self.fetch_once(&parsed).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    warn!("Attempt {} for {} failed ({}), retrying", attempt, url, e);
                    attempt += 1;
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    // * One attempt: verified TLS first, then unverified on connection failure.
    async fn fetch_once(&self, url: &Url) -> Result<String, FetchError> {
        match self.get(&self.verified, url).await {
            Err(FetchError::Reqwest(e)) if e.is_connect() => {
                warn!("Retrying {} without SSL verification ({})", url, e);
                self.get(&self.unverified, url).await
            }
            other => other,
        }
    }

    async fn get(&self, client: &Client, url: &Url) -> Result<String, FetchError> {
        let identity = IdentityProfile::for_url(url.as_str());
        let resp = client
            .get(url.clone())
            .headers(identity.headers())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyResponse);
        }

        Ok(body)
    }
}
