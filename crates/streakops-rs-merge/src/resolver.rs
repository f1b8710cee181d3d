//! Sentinel-anchored insertion-point resolution.

use crate::entry;
use serde_json::Value;

/// Resolve where a new campaign entry lands in `entries`.
///
/// Sentinels are tried in priority order: the first sentinel that is present
/// anywhere in `entries` decides the index, regardless of where lower-priority
/// sentinels sit. New entries are inserted immediately before the sentinel.
/// When no sentinel is present the entry is appended at the end.
pub fn resolve_insertion_index(entries: &[Value], sentinels: &[&str]) -> usize {
    for &sentinel in sentinels {
        if let Some(index) = entries
            .iter()
            .position(|candidate| entry::config_key(candidate) == Some(sentinel))
        {
            return index;
        }
    }
    entries.len()
}
