//! Client-side rate gate and request accounting.
//!
//! Provides a sliding-window rate limiter that proactively paces requests
//! under the FRED quota (120 requests per minute by default), plus atomic
//! counters describing what the client has sent and how the server answered.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Default quota: requests per window.
pub const DEFAULT_MAX_CALLS: u64 = 120;

/// Default sliding window duration.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60);

/// Sliding-window rate limiter.
///
/// Tracks timestamps of recent requests in a `VecDeque` behind a tokio Mutex.
/// When the window is full, `acquire()` sleeps until the oldest entry expires.
/// The lock is never held while sleeping.
#[derive(Debug)]
pub struct RateLimiter {
    timestamps: Mutex<VecDeque<Instant>>,
    max_calls: u64,
    period: Duration,
}

impl RateLimiter {
    /// Create a rate limiter with explicit quota and window. A quota of zero
    /// is treated as one call per window.
    pub fn new(max_calls: u64, period: Duration) -> Self {
        let max_calls = max_calls.max(1);
        Self {
            timestamps: Mutex::new(VecDeque::with_capacity(max_calls as usize)),
            max_calls,
            period,
        }
    }

    /// Wait until a request slot is available, then record the timestamp.
    ///
    /// Returns how long the caller was held back.
    pub async fn acquire(&self) -> Duration {
        let started = Instant::now();
        loop {
            let now = Instant::now();
            let mut ts = self.timestamps.lock().await;

            // Evict entries older than the window
            while ts
                .front()
                .is_some_and(|&t| now.duration_since(t) >= self.period)
            {
                ts.pop_front();
            }

            if (ts.len() as u64) < self.max_calls {
                ts.push_back(now);
                return now.duration_since(started);
            }

            let wait = match ts.front() {
                Some(&oldest) => (oldest + self.period).saturating_duration_since(now),
                None => Duration::ZERO,
            };
            drop(ts);

            tracing::debug!(
                wait_ms = wait.as_millis() as u64,
                max_calls = self.max_calls,
                period_secs = self.period.as_secs_f64(),
                "rate limit reached, waiting for a free slot"
            );
            sleep(wait).await;
        }
    }

    /// Non-blocking snapshot of remaining calls in the current window.
    ///
    /// Returns `None` if the lock is contended (callers should treat as "unknown").
    pub fn remaining_budget(&self) -> Option<u64> {
        match self.timestamps.try_lock() {
            Ok(ts) => {
                let now = Instant::now();
                let active = ts
                    .iter()
                    .filter(|&&t| now.duration_since(t) < self.period)
                    .count() as u64;
                Some(self.max_calls.saturating_sub(active))
            }
            Err(_) => None,
        }
    }

    pub fn max_calls(&self) -> u64 {
        self.max_calls
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CALLS, DEFAULT_PERIOD)
    }
}

const UNKNOWN: i64 = -1;

/// Atomic counters tracking request outcomes for one client and its clones.
#[derive(Debug)]
pub struct RequestTracker {
    requests_made: AtomicU64,
    requests_succeeded: AtomicU64,
    requests_rate_limited: AtomicU64,
    requests_failed: AtomicU64,
    /// Cumulative time spent in the rate gate, in milliseconds.
    total_wait_ms: AtomicU64,
    /// Last `x-rate-limit-limit` seen, or -1.
    server_limit: AtomicI64,
    /// Last `x-rate-limit-remaining` seen, or -1.
    server_remaining: AtomicI64,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestTracker {
    pub fn new() -> Self {
        Self {
            requests_made: AtomicU64::new(0),
            requests_succeeded: AtomicU64::new(0),
            requests_rate_limited: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            total_wait_ms: AtomicU64::new(0),
            server_limit: AtomicI64::new(UNKNOWN),
            server_remaining: AtomicI64::new(UNKNOWN),
        }
    }

    pub fn record_success(&self) {
        self.requests_made.fetch_add(1, Ordering::Relaxed);
        self.requests_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// The server rejected the request with 420 or 429.
    pub fn record_rate_limited(&self) {
        self.requests_made.fetch_add(1, Ordering::Relaxed);
        self.requests_rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.requests_made.fetch_add(1, Ordering::Relaxed);
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_wait(&self, duration: Duration) {
        self.total_wait_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Records the server's advertised quota. Informational only: the
    /// client-side [`RateLimiter`] is never adjusted from these values.
    pub fn record_server_quota(&self, limit: Option<u64>, remaining: Option<u64>) {
        if let Some(limit) = limit {
            self.server_limit.store(limit as i64, Ordering::Relaxed);
        }
        if let Some(remaining) = remaining {
            self.server_remaining.store(remaining as i64, Ordering::Relaxed);
        }
    }

    /// Snapshot the current counters.
    pub fn summary(&self) -> TrackerSummary {
        let known = |v: i64| (v >= 0).then_some(v as u64);
        TrackerSummary {
            requests_made: self.requests_made.load(Ordering::Relaxed),
            requests_succeeded: self.requests_succeeded.load(Ordering::Relaxed),
            requests_rate_limited: self.requests_rate_limited.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            total_wait_secs: self.total_wait_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            server_limit: known(self.server_limit.load(Ordering::Relaxed)),
            server_remaining: known(self.server_remaining.load(Ordering::Relaxed)),
        }
    }
}

/// Immutable snapshot of tracker counters for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSummary {
    pub requests_made: u64,
    pub requests_succeeded: u64,
    pub requests_rate_limited: u64,
    pub requests_failed: u64,
    pub total_wait_secs: f64,
    pub server_limit: Option<u64>,
    pub server_remaining: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn acquire_under_limit() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));

        for _ in 0..10 {
            assert_eq!(limiter.acquire().await, Duration::ZERO);
        }

        assert_eq!(limiter.remaining_budget(), Some(0));
    }

    #[tokio::test]
    async fn acquire_at_limit_blocks() {
        tokio::time::pause();

        let limiter = Arc::new(RateLimiter::new(3, Duration::from_secs(10)));

        for _ in 0..3 {
            limiter.acquire().await;
        }

        let limiter_clone = Arc::clone(&limiter);
        let handle = tokio::spawn(async move { limiter_clone.acquire().await });

        // Just short of expiry -- still pending
        tokio::time::advance(Duration::from_secs(9)).await;
        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        let waited = handle.await.unwrap();
        assert!(waited >= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn window_expiry() {
        tokio::time::pause();

        let limiter = RateLimiter::new(2, Duration::from_secs(5));

        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(limiter.remaining_budget(), Some(0));

        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(limiter.remaining_budget(), Some(2));

        limiter.acquire().await;
        assert_eq!(limiter.remaining_budget(), Some(1));
    }

    #[tokio::test]
    async fn no_window_holds_more_than_quota() {
        tokio::time::pause();

        let period = Duration::from_secs(1);
        let limiter = RateLimiter::new(4, period);
        let start = Instant::now();
        let mut sent = Vec::new();
        for _ in 0..13 {
            limiter.acquire().await;
            sent.push(Instant::now().duration_since(start));
        }

        for (i, t) in sent.iter().enumerate().skip(4) {
            assert!(
                *t - sent[i - 4] >= period,
                "calls {} and {} are closer than one period",
                i - 4,
                i
            );
        }
    }

    #[tokio::test]
    async fn zero_quota_is_one() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        assert_eq!(limiter.max_calls(), 1);
    }

    #[tokio::test]
    async fn defaults() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.max_calls(), 120);
        assert_eq!(limiter.period(), Duration::from_secs(60));
    }

    #[test]
    fn tracker_counters() {
        let tracker = RequestTracker::new();

        tracker.record_success();
        tracker.record_success();
        tracker.record_rate_limited();
        tracker.record_failure();
        tracker.record_wait(Duration::from_secs(60));

        let summary = tracker.summary();
        assert_eq!(summary.requests_made, 4);
        assert_eq!(summary.requests_succeeded, 2);
        assert_eq!(summary.requests_rate_limited, 1);
        assert_eq!(summary.requests_failed, 1);
        assert!((summary.total_wait_secs - 60.0).abs() < 0.01);
        assert_eq!(summary.server_limit, None);
    }

    #[test]
    fn server_quota_is_recorded() {
        let tracker = RequestTracker::new();
        tracker.record_server_quota(Some(120), Some(119));
        tracker.record_server_quota(None, Some(118));

        let summary = tracker.summary();
        assert_eq!(summary.server_limit, Some(120));
        assert_eq!(summary.server_remaining, Some(118));
    }
}
