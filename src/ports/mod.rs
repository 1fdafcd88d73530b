//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the loaders and the host
//! environment (resource fetching, task scheduling). Implementations live in
//! `src/adapters/`.

pub mod fetcher;
pub mod scheduler;

pub use fetcher::{FetchFuture, Fetcher};
pub use scheduler::{Scheduler, TickFuture};
