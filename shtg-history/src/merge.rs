use shtg_types::{Dialect, Entry};
use std::collections::HashSet;

/// Entries of `other` whose command does not appear in `own`.
///
/// Each missing command is returned once, in the order it first appears in
/// `other`, as a copy carrying only the command and timestamp and marked as
/// coming from `origin`.
pub fn missing_entries(own: &[Entry], other: &[Entry], origin: Dialect) -> Vec<Entry> {
    let mut known: HashSet<&str> = own.iter().map(|e| e.command.as_str()).collect();
    other
        .iter()
        .filter(|entry| known.insert(entry.command.as_str()))
        .map(|entry| entry.copied(origin))
        .collect()
}
