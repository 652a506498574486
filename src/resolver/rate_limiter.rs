//! Minimum spacing between outbound lookup calls

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Process-wide spacing gate for the lookup service.
///
/// Holds a single "last permitted call" instant behind an async mutex.
/// Waiters queue on the mutex in arrival order and sleep while holding it,
/// so permits are handed out strictly one `min_interval` apart.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait until a call is permitted. Returns the instant of the permit.
    pub async fn acquire(&self) -> Instant {
        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Rate limiting lookup call");
                sleep(wait).await;
            }
        }

        let now = Instant::now();
        *last_call = Some(now);
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        let granted = limiter.acquire().await;
        assert_eq!(granted, start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_calls_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(200));
        let mut grants = Vec::new();
        for _ in 0..5 {
            grants.push(limiter.acquire().await);
        }
        for pair in grants.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(200));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_clock() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();

        let mut grants = Vec::new();
        for handle in handles {
            grants.push(handle.await.unwrap());
        }
        grants.sort();
        for pair in grants.windows(2) {
            assert!(
                pair[1] - pair[0] >= Duration::from_millis(100),
                "permits {:?} apart",
                pair[1] - pair[0]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_idle_period() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        limiter.acquire().await;
        sleep(Duration::from_millis(80)).await;
        let before = Instant::now();
        let granted = limiter.acquire().await;
        assert_eq!(granted, before);
    }
}
