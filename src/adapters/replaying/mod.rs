//! Replaying adapters that serve recorded interactions.

pub mod fetcher;

pub use fetcher::ReplayingFetcher;
