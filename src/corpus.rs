//! Bundles every view the renderer needs into a single [`Corpus`].

use crate::archive::TemporalIndex;
use crate::entry::Entry;
use crate::recent::most_recent;
use crate::sort::newest_first;
use crate::tag::TagIndex;

/// The read-only views over one run's entries. All views borrow from the
/// entry slice the corpus was built from.
#[derive(Debug)]
pub struct Corpus<'a> {
    /// Every entry, newest first.
    pub by_date: Vec<&'a Entry>,

    /// Entries grouped by year and month.
    pub archive: TemporalIndex<'a>,

    /// Entries grouped by tag. Built from `by_date`, so each tag's entries
    /// are newest first.
    pub tags: TagIndex<'a>,

    /// The entries shown on the home page.
    pub index: Vec<&'a Entry>,

    /// The entries syndicated in the feed.
    pub feed: Vec<&'a Entry>,
}

impl<'a> Corpus<'a> {
    /// Aggregates `entries`. `index_entries` and `feed_entries` bound the
    /// home page and feed selections respectively.
    pub fn new(entries: &'a [Entry], index_entries: usize, feed_entries: usize) -> Corpus<'a> {
        let by_date = newest_first(entries);
        let archive = TemporalIndex::build(by_date.iter().copied());
        let tags = TagIndex::build(by_date.iter().copied());
        let index = most_recent(by_date.iter().copied(), index_entries);
        let feed = most_recent(by_date.iter().copied(), feed_entries);
        Corpus {
            by_date,
            archive,
            tags,
            index,
            feed,
        }
    }

    /// The entries immediately newer and older than `by_date[i]`, for
    /// previous/next links on entry pages.
    pub fn neighbors(&self, i: usize) -> (Option<&'a Entry>, Option<&'a Entry>) {
        let newer = match i {
            0 => None,
            _ => self.by_date.get(i - 1).copied(),
        };
        (newer, self.by_date.get(i + 1).copied())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entry::test::{dates, entry};

    fn corpus() -> Vec<Entry> {
        vec![
            entry(2023, 1, 5, &["go"]),
            entry(2023, 1, 20, &["go", "web"]),
            entry(2023, 3, 1, &["web"]),
            entry(2022, 12, 15, &[]),
        ]
    }

    #[test]
    fn test_corpus_views() {
        let entries = corpus();
        let corpus = Corpus::new(&entries, 2, 10);

        assert_eq!(
            dates(corpus.by_date.iter().copied()),
            vec!["2023-03-01", "2023-01-20", "2023-01-05", "2022-12-15"]
        );
        assert_eq!(
            dates(corpus.archive.iter()),
            dates(corpus.by_date.iter().copied())
        );
        assert_eq!(dates(corpus.index.iter().copied()), vec!["2023-03-01", "2023-01-20"]);
        assert_eq!(corpus.feed.len(), 4);

        let tags: Vec<(&str, Vec<String>)> = corpus
            .tags
            .tags()
            .iter()
            .map(|t| (t.name, dates(t.entries.iter().copied())))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("go", vec![String::from("2023-01-20"), String::from("2023-01-05")]),
                ("web", vec![String::from("2023-03-01"), String::from("2023-01-20")]),
            ]
        );
    }

    #[test]
    fn test_neighbors() {
        let entries = corpus();
        let corpus = Corpus::new(&entries, 3, 10);
        let (newer, older) = corpus.neighbors(0);
        assert!(newer.is_none());
        assert_eq!(older.map(|e| e.title.as_str()), Some("2023-01-20"));

        let (newer, older) = corpus.neighbors(3);
        assert_eq!(newer.map(|e| e.title.as_str()), Some("2023-01-05"));
        assert!(older.is_none());
    }

    #[test]
    fn test_empty_corpus() {
        let entries: Vec<Entry> = Vec::new();
        let corpus = Corpus::new(&entries, 3, 10);
        assert!(corpus.by_date.is_empty());
        assert!(corpus.archive.is_empty());
        assert!(corpus.tags.is_empty());
        assert!(corpus.index.is_empty());
        assert!(corpus.feed.is_empty());
    }
}
