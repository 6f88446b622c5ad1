// src/utils/rate_limit.rs

//! Politeness policies for outbound requests.
//!
//! Every request to the vocabulary service acquires the limiter first. The
//! jittered policy keeps a random minimum gap between consecutive requests,
//! no matter how many tasks share it.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Gate for outbound requests.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until the next request may be issued.
    async fn acquire(&self);
}

/// Uniformly random gap in `[min, max]` between consecutive requests.
///
/// The first acquisition never waits.
#[derive(Debug)]
pub struct JitteredDelay {
    min: Duration,
    max: Duration,
    last: Mutex<Option<Instant>>,
}

impl JitteredDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            last: Mutex::new(None),
        }
    }

    /// Draw the gap to enforce before the next request.
    fn draw(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

#[async_trait]
impl RateLimiter for JitteredDelay {
    async fn acquire(&self) {
        // Held across the sleep so concurrent callers queue up behind each other.
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let gap = self.draw();
            let ready_at = previous + gap;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// No delay at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn acquire(&self) {}
}
