use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS, USER_AGENT};
use xxhash_rust::xxh64::xxh64;

// * Desktop browser user agents the fetcher presents as.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.109 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.109 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.109 Safari/537.36",
];

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

// * IdentityProfile defines the browser-like headers sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityProfile {
    pub user_agent: &'static str,
}

impl IdentityProfile {
    // * Picks a user agent from the pool, stable for a given URL.
    pub fn for_url(url: &str) -> Self {
        let idx = (xxh64(url.as_bytes(), 0) % USER_AGENTS.len() as u64) as usize;
        Self {
            user_agent: USER_AGENTS[idx],
        }
    }

    // * Applies the configured profile to a mutable HeaderMap.
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) {
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    }

    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.apply_to_headers(&mut headers);
        headers
    }
}

impl Default for IdentityProfile {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENTS[0],
        }
    }
}
