//! Rate Limiter (per-caller Token Bucket)
//!
//! Caps how fast one user can hammer join/leave. Each user gets their own
//! bucket; buckets that have refilled completely are dropped on sweep.

use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::Mutex;
use waitlist_core::domain::UserId;

/// Buckets kept before idle ones are swept
const SWEEP_THRESHOLD: usize = 10_000;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Rate limiter keyed by user id
pub struct RateLimiter {
    buckets: Mutex<HashMap<UserId, Bucket>>,
    max_tokens: u32,
    refill_rate: u32, // tokens per second
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `max_tokens` - Maximum burst size per user
    /// * `refill_rate` - Tokens added per second per user
    pub fn new(max_tokens: u32, refill_rate: u32) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            max_tokens,
            refill_rate,
        }
    }

    /// Check if `user_id` may proceed (consumes 1 token)
    pub async fn check(&self, user_id: UserId) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;

        if buckets.len() >= SWEEP_THRESHOLD {
            self.sweep(&mut buckets, now);
        }

        let bucket = buckets.entry(user_id).or_insert(Bucket {
            tokens: self.max_tokens as f64,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate as f64).min(self.max_tokens as f64);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drop buckets that would be full again by now
    fn sweep(&self, buckets: &mut HashMap<UserId, Bucket>, now: Instant) {
        let max = self.max_tokens as f64;
        let rate = self.refill_rate as f64;
        buckets.retain(|_, b| b.tokens + now.duration_since(b.last_refill).as_secs_f64() * rate < max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::{sleep, Duration};

    #[tokio::test]
    async fn test_rate_limiter_allows_within_limit() {
        let limiter = RateLimiter::new(10, 10);

        for _ in 0..10 {
            assert!(limiter.check(1).await);
        }

        // 11th should be denied
        assert!(!limiter.check(1).await);
    }

    #[tokio::test]
    async fn test_buckets_are_per_user() {
        let limiter = RateLimiter::new(2, 1);

        assert!(limiter.check(1).await);
        assert!(limiter.check(1).await);
        assert!(!limiter.check(1).await);

        // Another user is unaffected
        assert!(limiter.check(2).await);
        assert_eq!(limiter.buckets.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_rate_limiter_refills() {
        let limiter = RateLimiter::new(5, 10); // 10 tokens/sec

        for _ in 0..5 {
            assert!(limiter.check(1).await);
        }
        assert!(!limiter.check(1).await);

        sleep(Duration::from_millis(300)).await;

        assert!(limiter.check(1).await);
    }

    #[tokio::test]
    async fn test_rate_limiter_concurrent() {
        let limiter = Arc::new(RateLimiter::new(20, 1));

        let mut handles = vec![];
        for _ in 0..10 {
            let limiter_clone = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                let mut allowed = 0;
                for _ in 0..10 {
                    if limiter_clone.check(7).await {
                        allowed += 1;
                    }
                }
                allowed
            }));
        }

        let mut total_allowed = 0;
        for handle in handles {
            total_allowed += handle.await.unwrap();
        }

        // 100 attempts from one user, burst of 20 (plus at most a token of refill)
        assert!(
            (20..=21).contains(&total_allowed),
            "Expected about 20 allowed, got {}",
            total_allowed
        );
    }
}
