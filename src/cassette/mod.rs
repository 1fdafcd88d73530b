//! Cassette format for recording and replaying fetches.

pub mod format;
pub mod recorder;
pub mod replayer;
