//! Position assignment and scope trimming over an in-memory snapshot.

use crate::entry::ScoreEntry;
use std::ops::Range;

/// Maximum rows a scope retains after trimming.
pub const MAX_ENTRIES: usize = 100;

/// Compute new 1-based positions for a scope snapshot.
///
/// Returns `(row_index, new_position)` for every row whose computed
/// position differs from its stored one, so the caller can write back only
/// the cells that changed. The input order (storage order) is never
/// mutated; the sort happens over an index permutation.
pub fn rank(entries: &[ScoreEntry]) -> Vec<(usize, u32)> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&a, &b| entries[a].ranking_cmp(&entries[b]));

    let mut changed = Vec::new();
    for (sorted_idx, &row_idx) in order.iter().enumerate() {
        let position = (sorted_idx + 1) as u32;
        if entries[row_idx].position != position {
            changed.push((row_idx, position));
        }
    }
    changed
}

/// Range of rows to delete once a scope exceeds [`MAX_ENTRIES`].
///
/// Trims from the front of storage order (oldest-inserted rows), not the
/// lowest-ranked ones. This preserves the observed upstream behavior: an
/// old top-ranked row can be evicted while a newer low-ranked one
/// survives. Kept for compatibility; see DESIGN.md.
pub fn trim_range(len: usize) -> Option<Range<usize>> {
    (len > MAX_ENTRIES).then(|| 0..len - MAX_ENTRIES)
}
