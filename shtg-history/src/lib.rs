//! History module for zsh and fish history files.
//!
//! This module provides:
//! - Codecs parsing and serializing both file formats
//! - A store holding one file's entries with atomic write-back
//! - Filters (dedup, pattern, recency) and cross-dialect merge
//!
//! # Module Structure
//!
//! - [`codec`] - File formats (`ZshCodec`, `FishCodec`)
//! - [`store`] - History store (`HistoryStore`)
//! - [`transform`] - Entry filters
//! - [`merge`] - Missing-command computation for sync

pub mod codec;
mod duration;
pub mod merge;
pub mod store;
pub mod transform;

#[cfg(test)]
mod tests;

pub use codec::{Codec, FishCodec, ZshCodec, codec_for};
pub use duration::parse_duration;
pub use store::{Destination, HistoryStore};
pub use transform::Transform;

/// Return the current time in seconds since the epoch
pub fn current_time_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
