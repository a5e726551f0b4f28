use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;

const WINDOW: Duration = Duration::from_secs(60);
const MAX_REQUESTS: u32 = 3;

#[derive(Debug)]
struct Window {
    count: u32,
    window_start: Instant,
}

/// Per-key fixed-window throttle. State is process-local: a restart resets
/// all counters, which is acceptable for a soft abuse deterrent. Multiple
/// worker processes would each keep their own counters; a shared external
/// counter is the scaling path.
pub struct FixedWindowLimiter {
    map: DashMap<String, Mutex<Window>>,
    window: Duration,
    max_requests: u32,
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(WINDOW, MAX_REQUESTS)
    }
}

impl FixedWindowLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        FixedWindowLimiter {
            map: DashMap::new(),
            window,
            max_requests,
        }
    }

    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    /// Clock-injectable variant used by tests.
    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        let entry = self.map.entry(key.to_string()).or_insert_with(|| {
            Mutex::new(Window {
                count: 0,
                window_start: now,
            })
        });
        let mut window = entry.lock();

        if now.duration_since(window.window_start) > self.window {
            window.count = 1;
            window.window_start = now;
            return true;
        }

        if window.count >= self.max_requests {
            return false;
        }

        window.count += 1;
        true
    }

    /// Drop entries whose window has long expired. Called from the
    /// background prune task.
    pub fn prune(&self, now: Instant) {
        self.map.retain(|_, window| {
            let window = window.lock();
            now.duration_since(window.window_start) <= self.window
        });
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> FixedWindowLimiter {
        FixedWindowLimiter::new(Duration::from_secs(60), 3)
    }

    #[test]
    fn fourth_request_in_window_is_denied() {
        let limiter = limiter();
        let now = Instant::now();

        assert!(limiter.allow_at("contact_form:1.2.3.4", now));
        assert!(limiter.allow_at("contact_form:1.2.3.4", now));
        assert!(limiter.allow_at("contact_form:1.2.3.4", now));
        assert!(!limiter.allow_at("contact_form:1.2.3.4", now));
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = limiter();
        let now = Instant::now();

        for _ in 0..3 {
            assert!(limiter.allow_at("k", now));
        }
        assert!(!limiter.allow_at("k", now));

        let later = now + Duration::from_secs(61);
        assert!(limiter.allow_at("k", later));
        assert!(limiter.allow_at("k", later));
    }

    #[test]
    fn keys_are_throttled_independently() {
        let limiter = limiter();
        let now = Instant::now();

        for _ in 0..3 {
            assert!(limiter.allow_at("contact_form:a", now));
        }
        assert!(!limiter.allow_at("contact_form:a", now));
        assert!(limiter.allow_at("contact_form:b", now));
    }

    #[test]
    fn prune_drops_expired_windows() {
        let limiter = limiter();
        let now = Instant::now();

        limiter.allow_at("stale", now);
        limiter.allow_at("fresh", now + Duration::from_secs(50));
        assert_eq!(limiter.tracked_keys(), 2);

        limiter.prune(now + Duration::from_secs(70));
        assert_eq!(limiter.tracked_keys(), 1);
    }
}
