//! Live adapters for real external interactions.

pub mod filesystem;
pub mod http;
pub mod scheduler;

pub use filesystem::DirectoryFetcher;
pub use http::HttpFetcher;
pub use scheduler::{IdleScheduler, TimerScheduler};
