// * Request Pacer
// * Spaces out page fetches during batch runs so a source is not hammered

use governor::{Quota, RateLimiter as GovernorLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use tracing::debug;

use crate::config::constants::DEFAULT_REQUESTS_PER_MINUTE;

type DirectLimiter = GovernorLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

// * RequestPacer holds a single unkeyed token bucket shared by every fetch
pub struct RequestPacer {
    limiter: DirectLimiter,
    per_minute: u32,
}

impl RequestPacer {
    // * A zero rate is clamped to one request per minute
    pub fn per_minute(requests: u32) -> Self {
        let rate = NonZeroU32::new(requests).unwrap_or(nonzero!(1u32));
        Self {
            limiter: GovernorLimiter::direct(Quota::per_minute(rate)),
            per_minute: rate.get(),
        }
    }

    pub fn rate(&self) -> u32 {
        self.per_minute
    }

    // * Waits until the next request is allowed
    pub async fn wait(&self) {
        if self.limiter.check().is_err() {
            debug!(per_minute = self.per_minute, "pacing next request");
            self.limiter.until_ready().await;
        }
    }
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::per_minute(DEFAULT_REQUESTS_PER_MINUTE)
    }
}
