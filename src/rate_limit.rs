//! Fixed-delay request pacing.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Paces successive requests against the remote API.
///
/// `acquire` returns once at least the configured delay has elapsed since the
/// previous acquisition. The delay is a deliberate courtesy interval for the
/// remote service, applied uniformly to search and detail calls.
pub struct RateLimiter {
    delay: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last: Mutex::new(None),
        }
    }

    /// Wait until the next request is allowed, then mark it as started.
    pub async fn acquire(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.delay;
            let now = Instant::now();
            if now < ready_at {
                debug!("rate limiting: waiting {:?}", ready_at - now);
                sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}
