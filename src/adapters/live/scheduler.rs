//! Live scheduling strategies on the tokio runtime.

use std::time::Duration;

use crate::ports::scheduler::{Scheduler, TickFuture};

/// Treats "the runtime has nothing else queued" as idle time.
///
/// Idle waits become a plain task yield, so deferred work runs as soon as
/// everything already scheduled has had a turn.
pub struct IdleScheduler;

impl Scheduler for IdleScheduler {
    fn yield_now(&self) -> TickFuture<'_> {
        Box::pin(tokio::task::yield_now())
    }

    fn idle(&self, _fallback: Duration) -> TickFuture<'_> {
        Box::pin(tokio::task::yield_now())
    }

    fn sleep(&self, duration: Duration) -> TickFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Fixed-delay fallback for hosts without idle detection.
pub struct TimerScheduler;

impl Scheduler for TimerScheduler {
    fn yield_now(&self) -> TickFuture<'_> {
        Box::pin(tokio::task::yield_now())
    }

    fn idle(&self, fallback: Duration) -> TickFuture<'_> {
        Box::pin(tokio::time::sleep(fallback))
    }

    fn sleep(&self, duration: Duration) -> TickFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn timer_idle_waits_the_fallback() {
        let start = Instant::now();
        TimerScheduler.idle(Duration::from_millis(500)).await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_scheduler_does_not_wait_the_fallback() {
        let start = Instant::now();
        IdleScheduler.idle(Duration::from_millis(500)).await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
