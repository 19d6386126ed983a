//! Defines the [`Entry`] type, the unit of content that every view in the
//! site is built from.

use chrono::NaiveDateTime;
use std::collections::BTreeSet;

/// The marker separating an entry's summary from the rest of its body.
pub const FOLD_TAG: &str = "<!-- more -->";

/// A single dated, tagged piece of content. Entries are produced by
/// [`crate::parser::Parser`] and are never mutated afterwards; every
/// aggregate in the crate borrows them.
///
/// `created` is a fully-resolved timestamp. Entries whose date could not be
/// parsed are rejected by the parser, so the aggregation code never has to
/// deal with a missing or invalid creation time.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    /// The entry's title.
    pub title: String,

    /// The entry's output path relative to the site root, e.g.
    /// `2023/hello.html`.
    pub url: String,

    /// When the entry was first published.
    pub created: NaiveDateTime,

    /// When the entry was last revised, if ever.
    pub updated: Option<NaiveDateTime>,

    /// The entry's tags, as written. Tag names are case-sensitive: `Rust`
    /// and `rust` are different tags.
    pub tags: BTreeSet<String>,

    /// A short description, used for the page's `<meta>` tags.
    pub description: String,

    /// The entry's author, if different from the site author.
    pub author: String,

    /// Languages used by code blocks in the entry, for syntax highlighting.
    pub languages: Vec<String>,

    /// The rendered HTML body.
    pub body: String,
}

impl Entry {
    /// Creates an entry with the required fields; the rest are empty.
    pub fn new(title: &str, url: &str, created: NaiveDateTime) -> Entry {
        Entry {
            title: title.to_owned(),
            url: url.to_owned(),
            created,
            updated: None,
            tags: BTreeSet::new(),
            description: String::new(),
            author: String::new(),
            languages: Vec::new(),
            body: String::new(),
        }
    }

    /// Replaces the entry's tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Entry
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the entry's update time.
    pub fn with_updated(mut self, updated: NaiveDateTime) -> Entry {
        self.updated = Some(updated);
        self
    }

    /// Returns the most recent of `created` and `updated`.
    pub fn last_modified(&self) -> NaiveDateTime {
        match self.updated {
            Some(updated) if updated > self.created => updated,
            _ => self.created,
        }
    }

    /// Returns the portion of the body before [`FOLD_TAG`] and whether the
    /// body was actually folded.
    pub fn summary(&self) -> (&str, bool) {
        match self.body.find(FOLD_TAG) {
            Some(i) => (&self.body[..i], true),
            None => (&self.body, false),
        }
    }
}
