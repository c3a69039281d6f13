use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Fixed-period tick source with explicit arm/cancel semantics.
///
/// Cancelling drops the interval, so a pending tick can never fire after a
/// phase transition — the session task only polls `tick()` from its own
/// select loop, and the drop happens synchronously within that loop.
#[derive(Debug, Default)]
pub struct TickScheduler {
    interval: Option<Interval>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self { interval: None }
    }

    /// Arm at the given period. The first tick fires one full period from
    /// now — never immediately, so re-arming after a speed change or resume
    /// cannot produce a double step.
    pub fn arm(&mut self, period: Duration) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
    }

    pub fn cancel(&mut self) {
        self.interval = None;
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Resolves on the next armed tick; pends forever while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            },
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn armed_scheduler_ticks_once_per_period() {
        let mut scheduler = TickScheduler::new();
        scheduler.arm(Duration::from_millis(100));

        let start = Instant::now();
        scheduler.tick().await;
        assert!(start.elapsed() >= Duration::from_millis(100));

        let before_second = Instant::now();
        scheduler.tick().await;
        assert!(before_second.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_scheduler_never_ticks() {
        let mut scheduler = TickScheduler::new();
        assert!(!scheduler.is_armed());
        let result =
            tokio::time::timeout(Duration::from_secs(60), scheduler.tick()).await;
        assert!(result.is_err(), "disarmed scheduler must pend forever");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_pending_tick() {
        let mut scheduler = TickScheduler::new();
        scheduler.arm(Duration::from_millis(50));
        scheduler.cancel();
        let result =
            tokio::time::timeout(Duration::from_secs(60), scheduler.tick()).await;
        assert!(result.is_err(), "cancelled scheduler must not fire a stale tick");
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_replaces_the_old_period() {
        let mut scheduler = TickScheduler::new();
        scheduler.arm(Duration::from_millis(500));
        scheduler.arm(Duration::from_millis(50));

        let start = Instant::now();
        scheduler.tick().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(500), "old interval must be gone");
    }
}
