//! Rate limiting for certificate-transparency queries
//!
//! crt.sh is a shared public service; the sweep is throttled with a token
//! bucket sized from the configured requests-per-second budget. No retry
//! machinery lives here: a failed query is skipped, never replayed.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// A token bucket rate limiter for controlling request rates
#[derive(Debug)]
pub struct RateLimiter {
    /// Tokens available in the bucket
    tokens: f64,
    /// Maximum tokens (bucket capacity)
    max_tokens: f64,
    /// Tokens added per second (refill rate)
    refill_rate: f64,
    /// Last time tokens were updated
    last_update: Instant,
    /// Whether rate limiting is enabled (false if rate is 0/unlimited)
    enabled: bool,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    /// If requests_per_second is 0, rate limiting is disabled
    pub fn new(requests_per_second: u32) -> Self {
        let enabled = requests_per_second > 0;
        let max_tokens = if enabled {
            // Allow burst of up to 1 second worth of requests
            requests_per_second as f64
        } else {
            f64::INFINITY
        };

        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate: requests_per_second as f64,
            last_update: Instant::now(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Refill tokens based on elapsed time
    fn refill(&mut self) {
        if !self.enabled {
            return;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_update = now;
    }

    /// Try to acquire a token, returning time to wait if not available
    pub fn try_acquire(&mut self) -> Option<Duration> {
        if !self.enabled {
            return None; // No wait needed
        }

        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            None // Token acquired, no wait
        } else {
            // Calculate wait time for next token
            let wait_secs = (1.0 - self.tokens) / self.refill_rate;
            Some(Duration::from_secs_f64(wait_secs))
        }
    }

    /// Acquire a token, waiting if necessary
    pub async fn acquire(&mut self) {
        loop {
            match self.try_acquire() {
                None => return, // Token acquired
                Some(wait_duration) => {
                    debug!("Rate limiter waiting {:?} for token", wait_duration);
                    sleep(wait_duration).await;
                    // Re-check after sleep - another task may have taken
                    // the token that became available
                }
            }
        }
    }
}

/// Thread-safe rate limiter wrapper
#[derive(Debug, Clone)]
pub struct SharedRateLimiter {
    inner: Arc<Mutex<RateLimiter>>,
}

impl SharedRateLimiter {
    /// Create a new shared rate limiter
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiter::new(requests_per_second))),
        }
    }

    /// Acquire a token, waiting if necessary
    pub async fn acquire(&self) {
        let mut limiter = self.inner.lock().await;
        limiter.acquire().await;
    }

    /// Check if rate limiting is enabled
    pub async fn is_enabled(&self) -> bool {
        let limiter = self.inner.lock().await;
        limiter.enabled
    }
}
