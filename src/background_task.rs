use std::{sync::Arc, time::Instant};

use tokio::time::{interval, Duration};

use crate::limiter::rate_limiter::FixedWindowLimiter;

/// Periodically drops expired rate-limit windows so the in-memory map
/// does not grow with every client IP ever seen.
pub async fn start_limiter_prune_task(limiter: Arc<FixedWindowLimiter>) {
    let mut interval = interval(Duration::from_secs(300));

    loop {
        interval.tick().await;

        limiter.prune(Instant::now());
        tracing::debug!(
            tracked = limiter.tracked_keys(),
            "pruned expired rate-limit windows"
        );
    }
}
