//! Brute-force substring search.

/// Returns true if `needle` occurs in `haystack`.
///
/// Every start position is tried in turn and the comparison for a position
/// stops at the first mismatching byte. The haystack is an in-memory slice,
/// so a failed candidate never consumes input: in `"aaab"` the failed window
/// at offset 0 does not hide the match of `"aab"` at offset 1.
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }

    (0..=haystack.len() - needle.len()).any(|start| {
        needle
            .iter()
            .zip(&haystack[start..])
            .all(|(expected, actual)| expected == actual)
    })
}
