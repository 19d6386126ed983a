//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: loading the templates, preparing
//! the output directory, copying static assets, parsing the entries
//! ([`crate::parser`]), aggregating them ([`crate::corpus`]), rendering every
//! page ([`crate::write`]), and generating the Atom feed ([`crate::feed`]).

use crate::config::Config;
use crate::corpus::Corpus;
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::parser::{Error as ParseError, Parser as EntryParser};
use crate::write::{Error as WriteError, Templates, Writer};
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// The feed's file name within the output directory.
pub const FEED_FILE: &str = "feed.atom";

/// Builds the site from a [`Config`] object, stamping generated pages with
/// the current date.
pub fn build_site(config: &Config) -> Result<()> {
    build_site_at(config, Utc::now())
}

/// Builds the site as of `now`. A failure to write the feed is logged and
/// otherwise ignored; every other failure aborts the build.
pub fn build_site_at(config: &Config, now: DateTime<Utc>) -> Result<()> {
    // Load the templates first so a broken theme fails before anything on
    // disk is touched.
    let templates = Templates::load(&config.template_directory)?;
    debug!(dir = %config.template_directory.display(), "loaded templates");

    if config.empty_output_directory {
        rmdir(&config.output_directory)?;
        info!(dir = %config.output_directory.display(), "emptied output directory");
    }
    fs::create_dir_all(&config.output_directory).map_err(|err| Error::CreateDir {
        path: config.output_directory.clone(),
        err,
    })?;

    if config.static_directory.is_dir() {
        let copied = copy_dir(&config.static_directory, &config.output_directory)?;
        info!(count = copied, "copied static files");
    } else {
        warn!(
            dir = %config.static_directory.display(),
            "static directory not found; no assets copied"
        );
    }

    let entries = EntryParser::new(&config.blog_directory).parse_entries()?;
    info!(count = entries.len(), "parsed entries");

    let corpus = Corpus::new(&entries, config.index_entries, config.feed_entries);
    info!(
        years = corpus.archive.years().len(),
        tags = corpus.tags.len(),
        "aggregated entries"
    );

    let generated = now.format("%Y-%m-%d").to_string();
    let writer = Writer {
        templates: &templates,
        output_directory: &config.output_directory,
        site_title: &config.title,
        site_description: &config.description,
        generated: &generated,
    };
    writer.write_site(&corpus)?;
    info!(dir = %config.output_directory.display(), "wrote pages");

    match write_feed_file(config, &corpus, now) {
        Ok(()) => info!(entries = corpus.feed.len(), "wrote {}", FEED_FILE),
        Err(e) => warn!(error = %e, "generating {} failed; no feed will be available", FEED_FILE),
    }

    Ok(())
}

fn write_feed_file(config: &Config, corpus: &Corpus, now: DateTime<Utc>) -> Result<()> {
    let file = File::create(config.output_directory.join(FEED_FILE)).map_err(FeedError::from)?;
    write_feed(
        &FeedConfig {
            title: &config.title,
            description: &config.description,
            author: config.author.as_ref(),
            site_url: &config.site_url,
            generated: now,
        },
        &corpus.feed,
        BufWriter::new(file),
    )?;
    Ok(())
}

/// Recursively copies the contents of `src` into `dst`, returning the number
/// of files copied.
fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;
    for result in WalkDir::new(src).min_depth(1) {
        let entry = result?;
        // strip_prefix() can't fail for paths yielded by the walk
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|err| Error::CreateDir { path: target, err })?;
        } else {
            fs::copy(entry.path(), &target).map_err(|err| Error::Copy {
                path: entry.path().to_owned(),
                err,
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn rmdir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing, writing,
/// cleaning and creating output directories, copying static files, and
/// writing the feed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned for errors during parsing.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Returned for errors rendering or writing pages.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Returned for I/O problems while cleaning the output directory.
    #[error("cleaning directory `{}`", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned for I/O problems while creating output directories.
    #[error("creating directory `{}`", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned for I/O problems while copying a static file.
    #[error("copying static file `{}`", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when walking the static directory fails.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// Returned for errors writing the feed.
    #[error(transparent)]
    Feed(#[from] FeedError),
}
