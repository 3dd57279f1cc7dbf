//! Filters that remove entries from a history sequence.
//!
//! Every filter consumes the sequence and returns the survivors in their
//! original order together with the number of removed entries.

use crate::duration::parse_duration;
use regex::Regex;
use shtg_types::{Entry, ShtgError, ShtgResult};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Transform {
    Dedup,
    PatternRemove(Regex),
    RecencyRemove(Duration),
}

impl Transform {
    pub fn pattern(pattern: &str) -> ShtgResult<Self> {
        if pattern.is_empty() {
            return Err(ShtgError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "empty pattern would match every entry".to_string(),
            });
        }
        let regex = Regex::new(pattern).map_err(|e| ShtgError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Transform::PatternRemove(regex))
    }

    pub fn recency(duration: &str) -> ShtgResult<Self> {
        Ok(Transform::RecencyRemove(parse_duration(duration)?))
    }

    /// Run the filter. `now` is seconds since the epoch.
    pub fn apply(&self, entries: Vec<Entry>, now: i64) -> (Vec<Entry>, usize) {
        match self {
            Transform::Dedup => dedup(entries),
            Transform::PatternRemove(regex) => remove_matching(entries, regex),
            Transform::RecencyRemove(window) => remove_recent(entries, *window, now),
        }
    }
}

fn retain(mut entries: Vec<Entry>, keep: impl FnMut(&Entry) -> bool) -> (Vec<Entry>, usize) {
    let before = entries.len();
    entries.retain(keep);
    let removed = before - entries.len();
    (entries, removed)
}

/// Keep the first occurrence of every command.
pub fn dedup(entries: Vec<Entry>) -> (Vec<Entry>, usize) {
    let mut seen = HashSet::new();
    retain(entries, |entry| seen.insert(entry.command.clone()))
}

pub fn remove_matching(entries: Vec<Entry>, regex: &Regex) -> (Vec<Entry>, usize) {
    retain(entries, |entry| !regex.is_match(&entry.command))
}

/// Whole seconds covering `window`, rounded up.
fn window_secs(window: Duration) -> i64 {
    let secs = window.as_secs() + u64::from(window.subsec_nanos() > 0);
    i64::try_from(secs).unwrap_or(i64::MAX)
}

/// Remove entries run within `window` before `now`. Entries without a
/// timestamp are always kept.
pub fn remove_recent(entries: Vec<Entry>, window: Duration, now: i64) -> (Vec<Entry>, usize) {
    let window = window_secs(window);
    retain(entries, |entry| match entry.timestamp {
        Some(when) => now.saturating_sub(when) > window,
        None => true,
    })
}
