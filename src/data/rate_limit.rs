//! Fixed-window per-user interaction limiter.
//!
//! In-memory only; a restart clears it. Administrators never reach this
//! table. The state is owned by [Data](crate::data::Data) rather than a
//! module-level singleton so tests can run independent instances.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::serenity;
use crate::setup::RateLimitConfig;

/// How often the stale-entry sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window request counter keyed by user.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_per_window: u32,
    entries: Mutex<HashMap<serenity::UserId, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_secs),
            max_per_window: config.max_per_window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one interaction for `user`. Returns `true` when the
    /// interaction is allowed, `false` when the window budget is spent.
    pub async fn check(&self, user: serenity::UserId) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let window = entries.entry(user).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });

        if now > window.reset_at {
            window.count = 0;
            window.reset_at = now + self.window;
        }

        if window.count >= self.max_per_window {
            return false;
        }

        window.count += 1;
        true
    }

    /// Evicts entries whose window has been stale for more than one extra
    /// window length, bounding memory growth.
    pub async fn sweep(&self) {
        let now = Instant::now();
        let window = self.window;
        self.entries
            .lock()
            .await
            .retain(|_, entry| now <= entry.reset_at + window);
    }

    /// Spawns the hourly sweep task.
    pub fn spawn_sweeper(self: &Arc<Self>) {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            // The first tick fires immediately; skip it.
            interval.tick().await;
            loop {
                interval.tick().await;
                limiter.sweep().await;
                tracing::debug!("Swept stale rate-limit entries.");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(window_secs: u64, max_per_window: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            window_secs,
            max_per_window,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_request_over_the_window_budget() {
        let limiter = limiter(60, 3);
        let user = serenity::UserId::new(1);

        for _ in 0..3 {
            assert!(limiter.check(user).await);
        }
        // The (max + 1)-th request inside the window is rejected.
        assert!(!limiter.check(user).await);
    }

    #[tokio::test(start_paused = true)]
    async fn window_expiry_resets_the_count_to_one() {
        let limiter = limiter(60, 3);
        let user = serenity::UserId::new(2);

        for _ in 0..3 {
            assert!(limiter.check(user).await);
        }
        assert!(!limiter.check(user).await);

        tokio::time::advance(Duration::from_secs(61)).await;

        // First request of the new window is accepted and starts at 1,
        // leaving room for the rest of the budget.
        assert!(limiter.check(user).await);
        assert!(limiter.check(user).await);
        assert!(limiter.check(user).await);
        assert!(!limiter.check(user).await);
    }

    #[tokio::test(start_paused = true)]
    async fn users_are_counted_independently() {
        let limiter = limiter(60, 1);
        let alice = serenity::UserId::new(3);
        let bob = serenity::UserId::new(4);

        assert!(limiter.check(alice).await);
        assert!(!limiter.check(alice).await);
        assert!(limiter.check(bob).await);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_only_entries_stale_past_one_extra_window() {
        let limiter = limiter(60, 5);
        let stale = serenity::UserId::new(5);
        let active = serenity::UserId::new(6);

        assert!(limiter.check(stale).await);
        tokio::time::advance(Duration::from_secs(100)).await;
        assert!(limiter.check(active).await);

        // stale resets at t=60, active at t=160. At t=125 the stale entry is
        // past reset + window while active is not.
        tokio::time::advance(Duration::from_secs(25)).await;
        limiter.sweep().await;

        let entries = limiter.entries.lock().await;
        assert!(!entries.contains_key(&stale));
        assert!(entries.contains_key(&active));
    }
}
