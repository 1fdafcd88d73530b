//! Scheduler port for cooperative yielding and low-priority work.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future type alias used by [`Scheduler`] to keep the trait dyn-compatible.
pub type TickFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Decides when deferred work gets to run.
///
/// Two strategies exist: one with a notion of idle time, and one that falls
/// back to fixed timers. The choice is made once at startup.
pub trait Scheduler: Send + Sync {
    /// Gives other pending work a turn before continuing.
    fn yield_now(&self) -> TickFuture<'_>;

    /// Waits for an idle slot.
    ///
    /// Strategies without idle detection wait `fallback` instead.
    fn idle(&self, fallback: Duration) -> TickFuture<'_>;

    /// Waits for `duration`.
    fn sleep(&self, duration: Duration) -> TickFuture<'_>;
}
