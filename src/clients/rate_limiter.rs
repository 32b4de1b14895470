//! Client-side request budget.
//!
//! [`RateLimiter`] keeps a sliding log of admission timestamps and admits at
//! most `capacity` requests in any `window`-length interval. Every outgoing
//! request, typed or debug, acquires one slot before it is sent.
//!
//! # Fairness
//!
//! The log lives behind a [`tokio::sync::Mutex`], which hands the lock to
//! waiters in the order they asked for it. A caller that finds the log full
//! keeps the lock while it sleeps until the oldest entry ages out, so callers
//! are admitted in arrival order and none can starve.
//!
//! # Example
//!
//! ```rust
//! use grocer_api::clients::RateLimiter;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let limiter = RateLimiter::new(2, Duration::from_secs(1));
//! limiter.acquire().await;
//! limiter.acquire().await;
//! assert_eq!(limiter.available().await, 0);
//! assert!(!limiter.try_acquire());
//! # });
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Sliding-log rate limiter shared by every request a client sends.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: usize,
    window: Duration,
    log: Mutex<VecDeque<Instant>>,
}

// Verify RateLimiter is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RateLimiter>();
};

impl RateLimiter {
    /// Creates a limiter admitting `capacity` requests per `window`.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: u32, window: Duration) -> Self {
        let capacity = usize::try_from(capacity.max(1)).unwrap_or(usize::MAX);
        Self {
            capacity,
            window,
            log: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Returns the number of admissions allowed per window.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the window length.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Waits for a slot and records the admission.
    ///
    /// Never fails. Dropping the returned future before it completes records
    /// nothing and releases the queue position.
    pub async fn acquire(&self) {
        let mut log = self.log.lock().await;
        loop {
            let now = Instant::now();
            self.prune(&mut log, now);
            if log.len() < self.capacity {
                log.push_back(now);
                return;
            }

            // Full: the front entry is the next to expire.
            let Some(&oldest) = log.front() else {
                continue;
            };
            let ready_at = oldest + self.window;
            tracing::debug!(
                wait_ms = ready_at.saturating_duration_since(now).as_millis(),
                capacity = self.capacity,
                "rate limit reached, waiting for a slot"
            );
            tokio::time::sleep_until(ready_at).await;
        }
    }

    /// Records an admission only if a slot is free right now.
    ///
    /// Returns `false` without waiting when the window is full or another
    /// caller is currently queued.
    pub fn try_acquire(&self) -> bool {
        let Ok(mut log) = self.log.try_lock() else {
            return false;
        };
        let now = Instant::now();
        self.prune(&mut log, now);
        if log.len() < self.capacity {
            log.push_back(now);
            true
        } else {
            false
        }
    }

    /// Returns how many requests could be admitted immediately.
    pub async fn available(&self) -> usize {
        let mut log = self.log.lock().await;
        self.prune(&mut log, Instant::now());
        self.capacity - log.len()
    }

    fn prune(&self, log: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&front) = log.front() {
            if now.saturating_duration_since(front) >= self.window {
                log.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_third_acquire_waits_for_window() {
        let limiter = RateLimiter::new(2, Duration::from_millis(1000));
        let start = Instant::now();

        limiter.acquire().await;
        let first = start.elapsed();
        limiter.acquire().await;
        let second = start.elapsed();
        limiter.acquire().await;
        let third = start.elapsed();

        assert!(first < Duration::from_millis(10));
        assert!(second < Duration::from_millis(10));
        assert!(third >= Duration::from_millis(1000), "third admitted at {third:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_free_up_as_window_slides() {
        let limiter = RateLimiter::new(3, Duration::from_millis(300));

        limiter.acquire().await;
        tokio::time::advance(Duration::from_millis(100)).await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(limiter.available().await, 0);

        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(limiter.available().await, 1);

        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(limiter.available().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_try_acquire_does_not_wait() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1));

        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(limiter.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiters_are_admitted_in_arrival_order() {
        let limiter = Arc::new(RateLimiter::new(1, Duration::from_millis(100)));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        limiter.acquire().await;

        let mut handles = Vec::new();
        for id in 0..5 {
            let limiter = limiter.clone();
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                order.lock().unwrap().push(id);
            }));
            // Let the task reach the lock queue before spawning the next one.
            tokio::task::yield_now().await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_acquire_records_nothing() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        limiter.acquire().await;

        let pending = tokio::time::timeout(Duration::from_secs(1), limiter.acquire()).await;
        assert!(pending.is_err());

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(limiter.available().await, 1);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        assert_eq!(limiter.capacity(), 1);
        assert_eq!(limiter.window(), Duration::from_secs(1));
    }
}
