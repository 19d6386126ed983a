//! Selects the "most recent" entries shown on the home page and in the feed.

use crate::entry::Entry;

/// Returns the first `max` entries of `entries` in traversal order, or all of
/// them if there are fewer. `entries` is consumed lazily and is never
/// advanced past the `max`th item, so passing a lazy walk such as
/// [`crate::archive::TemporalIndex::iter`] costs `O(max)`.
pub fn most_recent<'a, I>(entries: I, max: usize) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries.into_iter().take(max).collect()
}
