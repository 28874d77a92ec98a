pub mod fetcher;
pub mod rate_limiter;
pub mod slow_path;

pub use fetcher::{FetchStrategy, FetchedPage, PageFetcher};
pub use rate_limiter::RequestPacer;
pub use slow_path::BrowserRenderer;
