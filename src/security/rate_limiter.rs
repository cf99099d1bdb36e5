use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

/// Fixed one-minute window counter, keyed by login name
pub struct RateLimiter {
    requests: DashMap<String, (AtomicU32, AtomicI64)>,
    max_requests_per_minute: u32,
}

impl RateLimiter {
    pub fn new(max_requests_per_minute: u32) -> Self {
        Self {
            requests: DashMap::new(),
            max_requests_per_minute,
        }
    }

    pub fn check_and_increment(&self, key: &str, current_time: i64) -> bool {
        let entry = self
            .requests
            .entry(key.to_string())
            .or_insert_with(|| (AtomicU32::new(0), AtomicI64::new(current_time)));

        let (count, window_start) = entry.value();
        let window_start_time = window_start.load(Ordering::Relaxed);

        if current_time - window_start_time >= 60 {
            window_start.store(current_time, Ordering::Relaxed);
            count.store(1, Ordering::Relaxed);
            return true;
        }

        let current_count = count.fetch_add(1, Ordering::Relaxed) + 1;

        current_count <= self.max_requests_per_minute
    }

    pub fn cleanup_old_entries(&self, current_time: i64) {
        self.requests.retain(|_, (_, window_start)| {
            current_time - window_start.load(Ordering::Relaxed) < 60
        });
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_first_request() {
        let limiter = RateLimiter::new(10);
        assert!(limiter.check_and_increment("alice", 1000));
    }

    #[test]
    fn test_rate_limiter_allows_within_limit() {
        let limiter = RateLimiter::new(5);

        for _ in 0..5 {
            assert!(limiter.check_and_increment("alice", 1000));
        }
    }

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new(3);

        for _ in 0..3 {
            assert!(limiter.check_and_increment("alice", 1000));
        }

        assert!(!limiter.check_and_increment("alice", 1000));
    }

    #[test]
    fn test_rate_limiter_keys_are_independent() {
        let limiter = RateLimiter::new(1);

        assert!(limiter.check_and_increment("alice", 1000));
        assert!(!limiter.check_and_increment("alice", 1000));
        assert!(limiter.check_and_increment("bob", 1000));
    }

    #[test]
    fn test_rate_limiter_window_resets() {
        let limiter = RateLimiter::new(2);

        assert!(limiter.check_and_increment("alice", 1000));
        assert!(limiter.check_and_increment("alice", 1000));
        assert!(!limiter.check_and_increment("alice", 1030));

        // A minute later the window starts over
        assert!(limiter.check_and_increment("alice", 1060));
    }

    #[test]
    fn test_rate_limiter_cleanup() {
        let limiter = RateLimiter::new(10);

        limiter.check_and_increment("alice", 1000);
        limiter.check_and_increment("bob", 1050);
        assert_eq!(limiter.len(), 2);

        limiter.cleanup_old_entries(1070);
        assert_eq!(limiter.len(), 1);

        limiter.cleanup_old_entries(1200);
        assert!(limiter.is_empty());
    }
}
