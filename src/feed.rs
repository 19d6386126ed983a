//! Support for creating Atom feeds from the feed's recency slice.

use crate::config::Author;
use crate::entry::Entry;
use atom_syndication::{
    Category, Entry as AtomEntry, Error as AtomError, Feed, FixedDateTime, Link, Person, Text,
};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::io::Write;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub author: Option<&'a Author>,

    /// The site's root URL. Used as the feed ID and to make entry URLs
    /// absolute.
    pub site_url: &'a Url,

    /// The feed's `updated` stamp when there are no entries to take it from.
    pub generated: DateTime<Utc>,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// entries, newest first, and writes the result to a [`std::io::Write`].
pub fn write_feed<W: Write>(config: &FeedConfig, entries: &[&Entry], w: W) -> Result<()> {
    feed(config, entries)?.write_to(w)?;
    Ok(())
}

fn feed(config: &FeedConfig, entries: &[&Entry]) -> Result<Feed> {
    let updated = entries
        .iter()
        .map(|e| e.last_modified())
        .max()
        .map(utc)
        .unwrap_or_else(|| config.generated.into());

    let mut feed = Feed::default();
    feed.set_title(Text::plain(config.title));
    if !config.description.is_empty() {
        feed.set_subtitle(Some(Text::plain(config.description)));
    }
    feed.set_id(config.site_url.to_string());
    feed.set_updated(updated);
    feed.set_authors(author_to_people(config.author));
    feed.set_links(vec![alternate(config.site_url.as_str())]);
    feed.set_entries(
        entries
            .iter()
            .map(|e| feed_entry(config, e))
            .collect::<Result<Vec<AtomEntry>>>()?,
    );
    Ok(feed)
}

fn feed_entry(config: &FeedConfig, entry: &Entry) -> Result<AtomEntry> {
    let url = config.site_url.join(&entry.url)?;
    let (summary, _) = entry.summary();

    let mut e = AtomEntry::default();
    e.set_id(url.to_string());
    e.set_title(Text::plain(entry.title.as_str()));
    e.set_published(Some(utc(entry.created)));
    e.set_updated(utc(entry.last_modified()));
    e.set_links(vec![alternate(url.as_str())]);
    e.set_summary(Some(Text::html(summary)));
    e.set_categories(
        entry
            .tags
            .iter()
            .map(|t| {
                let mut category = Category::default();
                category.set_term(t.as_str());
                category
            })
            .collect::<Vec<Category>>(),
    );
    if !entry.author.is_empty() {
        let mut person = Person::default();
        person.set_name(entry.author.as_str());
        e.set_authors(vec![person]);
    }
    Ok(e)
}

// Entry timestamps carry no zone; they're published as UTC.
fn utc(date: NaiveDateTime) -> FixedDateTime {
    Utc.from_utc_datetime(&date).into()
}

fn alternate(href: &str) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel("alternate");
    link
}

fn author_to_people(author: Option<&Author>) -> Vec<Person> {
    match author {
        Some(author) => {
            let mut person = Person::default();
            person.set_name(author.name.as_str());
            person.set_email(author.email.clone());
            vec![person]
        }
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, and URL
/// issues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Returned when there is an Atom-related error.
    #[error(transparent)]
    Atom(#[from] AtomError),

    /// Returned when an entry URL can't be joined onto the site URL.
    #[error("building entry URL: {0}")]
    UrlParse(#[from] url::ParseError),
}
