//! ============================================================================
//! Set Analysis
//! ============================================================================
//! Pure set relationships over collected username sets. No side effects;
//! empty inputs yield empty results.
//! ============================================================================

use std::collections::HashSet;

use crate::types::Username;

/// Accounts present in both sets. Iterates the smaller set and probes the
/// larger, so the cost is O(min(|followers|, |following|)).
pub fn mutuals(
    followers: &HashSet<Username>,
    following: &HashSet<Username>,
) -> HashSet<Username> {
    let (smaller, larger) = if followers.len() <= following.len() {
        (followers, following)
    } else {
        (following, followers)
    };
    smaller
        .iter()
        .filter(|username| larger.contains(*username))
        .cloned()
        .collect()
}

/// Lexicographically sorted listing of a set, for report output
pub fn sorted(set: &HashSet<Username>) -> Vec<Username> {
    let mut listing: Vec<Username> = set.iter().cloned().collect();
    listing.sort();
    listing
}
