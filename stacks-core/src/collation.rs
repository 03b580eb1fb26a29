//! Case-folded string comparison used for every user-facing sort
//! (titles, authors, contributor names).

use std::cmp::Ordering;

/// Sort key for a display string: trimmed and Unicode-lowercased.
pub fn sort_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Compare two display strings ascending, case-insensitively.
///
/// Equal folded keys fall back to byte order so the result is deterministic;
/// fully equal strings keep their pre-sort relative order (callers use
/// stable sorts).
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b))
}
