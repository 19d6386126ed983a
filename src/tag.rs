//! Defines the [`Tag`] and [`TagIndex`] types, which group entries by the
//! tags they carry.

use crate::entry::Entry;
use std::collections::HashMap;

/// A tag and the entries carrying it. Entries are kept in the order the
/// index builder encountered them.
#[derive(Debug)]
pub struct Tag<'a> {
    /// The tag's name, as it appears in [`Entry::tags`].
    pub name: &'a str,

    /// The entries carrying this tag, in scan order.
    pub entries: Vec<&'a Entry>,
}

/// Entries grouped by tag, exposed alphabetically by tag name.
///
/// Buckets are NOT re-sorted by date: a bucket lists its entries in the
/// order they were scanned. Build the index from a
/// [`crate::sort::newest_first`] sequence to get chronological buckets.
#[derive(Debug, Default)]
pub struct TagIndex<'a> {
    tags: Vec<Tag<'a>>,
}

impl<'a> TagIndex<'a> {
    /// Builds the index. An entry with `k` tags lands in exactly `k`
    /// buckets; an untagged entry lands in none.
    pub fn build<I>(entries: I) -> TagIndex<'a>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut buckets: HashMap<&'a str, Tag<'a>> = HashMap::new();
        for entry in entries {
            for name in entry.tags.iter() {
                buckets
                    .entry(name.as_str())
                    .or_insert_with(|| Tag {
                        name: name.as_str(),
                        entries: Vec::new(),
                    })
                    .entries
                    .push(entry);
            }
        }

        let mut tags: Vec<Tag<'a>> = buckets.into_iter().map(|(_, tag)| tag).collect();
        // names are unique keys, so an unstable sort is deterministic
        tags.sort_unstable_by(|a, b| a.name.cmp(b.name));
        TagIndex { tags }
    }

    /// The tags, alphabetically by name.
    pub fn tags(&self) -> &[Tag<'a>] {
        &self.tags
    }

    /// Looks a tag up by name.
    pub fn get(&self, name: &str) -> Option<&Tag<'a>> {
        self.tags
            .binary_search_by(|t| t.name.cmp(name))
            .ok()
            .map(|i| &self.tags[i])
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
