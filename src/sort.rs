//! Chronological ordering of entries.

use crate::entry::Entry;

/// Returns `entries` ordered by creation time, newest first.
///
/// The sort is stable: entries created at the same instant keep the order in
/// which they were supplied. "Most recent N" selections downstream rely on
/// this to be deterministic for a given input order.
pub fn newest_first<'a, I>(entries: I) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut sorted: Vec<&'a Entry> = entries.into_iter().collect();
    sort_newest_first(&mut sorted);
    sorted
}

/// Sorts a vector of entry references in place, newest first. Stable.
pub(crate) fn sort_newest_first(entries: &mut [&Entry]) {
    entries.sort_by(|a, b| b.created.cmp(&a.created));
}
