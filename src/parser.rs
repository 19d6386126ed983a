//! Defines the [`Parser`] and [`Error`] types: the logic for loading
//! [`Entry`] objects from markdown source files on disk.

use std::{
    collections::BTreeSet,
    fs::File,
    io::Read,
    path::{Component, Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pulldown_cmark::{html, Options, Parser as MarkdownParser};
use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::entry::Entry;

const MARKDOWN_EXTENSION: &str = "md";
const HTML_EXTENSION: &str = "html";

/// Parses [`Entry`] objects from the markdown files under a blog directory.
pub struct Parser<'a> {
    /// `blog_directory` is searched recursively for `.md` files. Entry URLs
    /// are derived from file paths relative to this directory.
    blog_directory: &'a Path,
}

impl<'a> Parser<'a> {
    pub fn new(blog_directory: &'a Path) -> Parser<'a> {
        Parser { blog_directory }
    }

    /// Searches the blog directory for entry files (extension = `.md`) and
    /// parses each of them. Files are visited in file-name order, so the
    /// result is deterministic but otherwise unordered; sorting is the
    /// aggregation layer's job. Each file must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `Title`, `Date`, and optionally
    ///    `Updated`, `Tags`, `Description`, `Author`, and `Languages`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Entry body in markdown
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// Title: Hello, world!
    /// Date: 2021-04-16
    /// Tags: [greet]
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_entries(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for result in WalkDir::new(self.blog_directory)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let dir_entry = result?;
            let path = dir_entry.path();
            if dir_entry.file_type().is_file()
                && path.extension().map_or(false, |ext| ext == MARKDOWN_EXTENSION)
            {
                // strip_prefix() can't fail for paths yielded by the walk
                let relative_path = path
                    .strip_prefix(self.blog_directory)
                    .unwrap_or(path);
                entries.push(self.parse_entry(path, relative_path)?);
            }
        }
        debug!(count = entries.len(), "parsed entries");
        Ok(entries)
    }

    fn parse_entry(&self, path: &Path, relative_path: &Path) -> Result<Entry> {
        let read = || -> Result<Entry> {
            let mut contents = String::new();
            File::open(path)?.read_to_string(&mut contents)?;
            parse_str(relative_path, &contents)
        };
        read().map_err(|e| Error::Annotated(relative_path.to_owned(), Box::new(e)))
    }
}

/// Parses a single [`Entry`] from the source text of the file at
/// `relative_path` (relative to the blog directory). The path determines the
/// entry URL: `2021/hello.md` becomes `2021/hello.html`.
pub fn parse_str(relative_path: &Path, input: &str) -> Result<Entry> {
    // Fences must sit on lines of their own; `---` inside a value is text.
    fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
        const FENCE: &str = "---";
        fn ends_line(rest: &str) -> bool {
            rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n")
        }

        if !input.starts_with(FENCE) || !ends_line(&input[FENCE.len()..]) {
            return Err(Error::FrontmatterMissingStartFence);
        }
        let mut search = FENCE.len();
        while let Some(offset) = input[search..].find("\n---") {
            let yaml_stop = search + offset + 1;
            let body_start = yaml_stop + FENCE.len();
            if ends_line(&input[body_start..]) {
                return Ok((FENCE.len(), yaml_stop, body_start));
            }
            search = body_start;
        }
        Err(Error::FrontmatterMissingEndFence)
    }

    let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
    let frontmatter: Frontmatter = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

    let created = parse_date(&frontmatter.date)?;
    let updated = match &frontmatter.updated {
        Some(date) => Some(parse_date(date)?),
        None => None,
    };

    Ok(Entry {
        title: frontmatter.title,
        url: entry_url(relative_path)?,
        created,
        updated,
        tags: tags(frontmatter.tags)?,
        description: frontmatter.description,
        author: frontmatter.author,
        languages: frontmatter.languages,
        body: markdown_to_html(&input[body_start..]),
    })
}

// Tag names are kept as written. A tag needs at least one character that
// survives slugging, since the tags page anchors its heading on the slug.
fn tags(names: BTreeSet<String>) -> Result<BTreeSet<String>> {
    names
        .into_iter()
        .map(|name| {
            let name = name.trim();
            if slug::slugify(name).is_empty() {
                Err(Error::InvalidTag(name.to_owned()))
            } else {
                Ok(name.to_owned())
            }
        })
        .collect()
}

/// Parses an entry date. Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM`,
/// `YYYY-MM-DD HH:MM:SS`, and RFC 3339 timestamps. An RFC 3339 timestamp
/// keeps its wall-clock time in its own offset, so an entry dated just after
/// midnight local time stays on that calendar day.
pub fn parse_date(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_local());
    }
    for format in &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::InvalidDate(input.to_owned()))
}

fn entry_url(relative_path: &Path) -> Result<String> {
    let with_extension = relative_path.with_extension(HTML_EXTENSION);
    let mut segments = Vec::new();
    for component in with_extension.components() {
        match component {
            Component::Normal(segment) => segments.push(
                segment
                    .to_str()
                    .ok_or_else(|| Error::InvalidFileName(relative_path.to_owned()))?,
            ),
            Component::CurDir => {}
            _ => return Err(Error::InvalidFileName(relative_path.to_owned())),
        }
    }
    if segments.is_empty() {
        return Err(Error::InvalidFileName(relative_path.to_owned()));
    }
    Ok(segments.join("/"))
}

fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut body = String::new();
    html::push_html(&mut body, MarkdownParser::new_ext(markdown, options));
    body
}

#[derive(Deserialize, Clone)]
struct Frontmatter {
    /// The title of the entry.
    #[serde(rename = "Title")]
    pub title: String,

    /// The creation date of the entry.
    #[serde(rename = "Date")]
    pub date: String,

    /// The date the entry was last revised.
    #[serde(default, rename = "Updated")]
    pub updated: Option<String>,

    /// The tags associated with the entry.
    #[serde(default, rename = "Tags")]
    pub tags: BTreeSet<String>,

    #[serde(default, rename = "Description")]
    pub description: String,

    #[serde(default, rename = "Author")]
    pub author: String,

    #[serde(default, rename = "Languages")]
    pub languages: Vec<String>,
}

/// Represents the result of an [`Entry`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing an [`Entry`] object.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a source file is missing its starting frontmatter fence
    /// (`---`).
    #[error("entry must begin with `---`")]
    FrontmatterMissingStartFence,

    /// Returned when a source file is missing its terminal frontmatter fence.
    #[error("missing closing `---`")]
    FrontmatterMissingEndFence,

    /// Returned when the `Date` or `Updated` field isn't a recognized date.
    #[error("invalid date `{0}`")]
    InvalidDate(String),

    /// Returned when there was an error parsing the frontmatter as YAML.
    #[error(transparent)]
    DeserializeYaml(#[from] serde_yaml::Error),

    /// Returned for other I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Returned for WalkDir I/O errors.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// Returned when a tag has nothing to slug its anchor from, e.g. `!!!`.
    #[error("invalid tag `{0}`")]
    InvalidTag(String),

    /// Returned when a source path can't be turned into a URL.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(PathBuf),

    /// An error with the path of the file it occurred in.
    #[error("parsing entry `{}`", .0.display())]
    Annotated(PathBuf, #[source] Box<Error>),
}
