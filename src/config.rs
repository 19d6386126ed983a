use anyhow::{anyhow, Context, Result};
use clap::{App, Arg, ArgMatches};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the optional project file in the working directory.
pub const PROJECT_FILE: &str = "quire.yaml";

const DEFAULT_INDEX_ENTRIES: usize = 3;
const DEFAULT_FEED_ENTRIES: usize = 10;
const DEFAULT_SITE_URL: &str = "http://localhost/";

/// The site's author, credited in the feed.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize, Default)]
struct Project {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    url: Option<Url>,

    #[serde(default)]
    author: Option<Author>,

    #[serde(default)]
    index_entries: Option<usize>,

    #[serde(default)]
    feed_entries: Option<usize>,
}

/// The command-line options. Directories are relative to
/// `working_directory`; unset values fall back to the project file and then
/// to the defaults.
#[derive(Debug, Default)]
pub struct Options {
    pub working_directory: PathBuf,
    pub output_directory: Option<PathBuf>,
    pub empty_output_directory: bool,
    pub template_directory: Option<PathBuf>,
    pub blog_directory: Option<PathBuf>,
    pub static_directory: Option<PathBuf>,
    pub url: Option<String>,
    pub index_entries: Option<usize>,
    pub feed_entries: Option<usize>,
}

/// The fully-resolved configuration for a build.
#[derive(Debug)]
pub struct Config {
    pub title: String,
    pub description: String,
    pub author: Option<Author>,

    /// The site's root URL, always ending in `/`.
    pub site_url: Url,

    pub output_directory: PathBuf,

    /// Whether to delete the output directory's contents before building.
    pub empty_output_directory: bool,

    pub template_directory: PathBuf,
    pub blog_directory: PathBuf,
    pub static_directory: PathBuf,

    /// The maximum number of entries on the home page.
    pub index_entries: usize,

    /// The maximum number of entries in the feed.
    pub feed_entries: usize,
}

/// Defines the command-line interface.
pub fn app() -> App<'static, 'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("working-dir")
                .short("w")
                .long("working-dir")
                .takes_value(true)
                .default_value("./")
                .help("The directory where all the other directories reside"),
        )
        .arg(
            Arg::with_name("output-dir")
                .short("o")
                .long("output-dir")
                .takes_value(true)
                .help("The directory where the results should be placed [default: public]"),
        )
        .arg(
            Arg::with_name("empty-output-dir")
                .short("x")
                .long("empty-output-dir")
                .help("Delete everything inside the output directory before writing to it"),
        )
        .arg(
            Arg::with_name("template-dir")
                .short("t")
                .long("template-dir")
                .takes_value(true)
                .help("The directory where the site templates are located [default: templates]"),
        )
        .arg(
            Arg::with_name("blog-dir")
                .short("b")
                .long("blog-dir")
                .takes_value(true)
                .help("The directory where the blog entries are located [default: blogs]"),
        )
        .arg(
            Arg::with_name("static-dir")
                .short("s")
                .long("static-dir")
                .takes_value(true)
                .help("The directory where the static assets are located [default: static]"),
        )
        .arg(
            Arg::with_name("url")
                .short("u")
                .long("url")
                .takes_value(true)
                .help("The site URL, prepended to links in the feed"),
        )
        .arg(
            Arg::with_name("index-entries")
                .short("i")
                .long("index-entries")
                .takes_value(true)
                .help("The maximum number of entries to display on the index page [default: 3]"),
        )
        .arg(
            Arg::with_name("feed-entries")
                .short("f")
                .long("feed-entries")
                .takes_value(true)
                .help("The maximum number of entries to include in the feed [default: 10]"),
        )
}

impl Options {
    pub fn from_matches(matches: &ArgMatches) -> Result<Options> {
        fn count(matches: &ArgMatches, name: &str) -> Result<Option<usize>> {
            matches
                .value_of(name)
                .map(|v| {
                    v.parse::<usize>().with_context(|| {
                        format!(
                            "--{} must be a non-negative integer, got `{}`",
                            name, v
                        )
                    })
                })
                .transpose()
        }

        let path = |name: &str| matches.value_of(name).map(PathBuf::from);
        Ok(Options {
            working_directory: path("working-dir").unwrap_or_else(|| PathBuf::from("./")),
            output_directory: path("output-dir"),
            empty_output_directory: matches.is_present("empty-output-dir"),
            template_directory: path("template-dir"),
            blog_directory: path("blog-dir"),
            static_directory: path("static-dir"),
            url: matches.value_of("url").map(str::to_owned),
            index_entries: count(matches, "index-entries")?,
            feed_entries: count(matches, "feed-entries")?,
        })
    }
}

impl Config {
    /// Resolves `options` against the project file in the working directory,
    /// if there is one.
    pub fn from_options(options: Options) -> Result<Config> {
        let project_file = options.working_directory.join(PROJECT_FILE);
        let project = if project_file.exists() {
            Config::load_project(&project_file)
                .with_context(|| format!("Loading configuration `{}`", project_file.display()))?
        } else {
            Project::default()
        };

        let site_url = match &options.url {
            Some(url) => Url::parse(url).with_context(|| format!("Invalid site URL `{}`", url))?,
            None => match project.url {
                Some(url) => url,
                None => Url::parse(DEFAULT_SITE_URL)?,
            },
        };

        let root = &options.working_directory;
        let dir = |opt: Option<PathBuf>, default: &str| {
            root.join(opt.unwrap_or_else(|| PathBuf::from(default)))
        };

        Ok(Config {
            title: project.title.unwrap_or_default(),
            description: project.description.unwrap_or_default(),
            author: project.author,
            site_url: with_trailing_slash(site_url)?,
            output_directory: dir(options.output_directory, "public"),
            empty_output_directory: options.empty_output_directory,
            template_directory: dir(options.template_directory, "templates"),
            blog_directory: dir(options.blog_directory, "blogs"),
            static_directory: dir(options.static_directory, "static"),
            index_entries: options
                .index_entries
                .or(project.index_entries)
                .unwrap_or(DEFAULT_INDEX_ENTRIES),
            feed_entries: options
                .feed_entries
                .or(project.feed_entries)
                .unwrap_or(DEFAULT_FEED_ENTRIES),
        })
    }

    fn load_project(path: &Path) -> Result<Project> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

// `Url::join` treats the last path segment as a file unless it ends in `/`.
fn with_trailing_slash(mut url: Url) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(anyhow!("Site URL `{}` can't be used as a base URL", url));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn options(args: &[&str]) -> Result<Options> {
        let mut argv = vec!["quire"];
        argv.extend_from_slice(args);
        Options::from_matches(&app().get_matches_from_safe(argv)?)
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let working_dir = dir.path().to_str().unwrap();
        let config = Config::from_options(options(&["-w", working_dir])?)?;
        assert_eq!(config.output_directory, dir.path().join("public"));
        assert_eq!(config.template_directory, dir.path().join("templates"));
        assert_eq!(config.blog_directory, dir.path().join("blogs"));
        assert_eq!(config.static_directory, dir.path().join("static"));
        assert_eq!(config.index_entries, 3);
        assert_eq!(config.feed_entries, 10);
        assert_eq!(config.site_url.as_str(), "http://localhost/");
        assert!(!config.empty_output_directory);
        assert!(config.author.is_none());
        Ok(())
    }

    #[test]
    fn test_project_file_and_overrides() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(PROJECT_FILE),
            "title: Field Notes\nurl: https://example.org/blog\nauthor:\n  name: Jo\nindex_entries: 5\nfeed_entries: 20\n",
        )?;
        let working_dir = dir.path().to_str().unwrap();

        let config = Config::from_options(options(&["-w", working_dir, "-i", "7", "-x"])?)?;
        assert_eq!(config.title, "Field Notes");
        assert_eq!(config.site_url.as_str(), "https://example.org/blog/");
        assert_eq!(config.index_entries, 7);
        assert_eq!(config.feed_entries, 20);
        assert!(config.empty_output_directory);
        assert_eq!(
            config.author,
            Some(Author {
                name: String::from("Jo"),
                email: None
            })
        );

        let config = Config::from_options(options(&[
            "-w",
            working_dir,
            "--url",
            "https://other.example/",
            "-o",
            "out",
        ])?)?;
        assert_eq!(config.site_url.as_str(), "https://other.example/");
        assert_eq!(config.output_directory, dir.path().join("out"));
        Ok(())
    }

    #[test]
    fn test_invalid_count() {
        assert!(options(&["-i", "many"]).is_err());
        assert!(options(&["-f", "-1"]).is_err());
    }

    #[test]
    fn test_malformed_project_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(PROJECT_FILE), "index_entries: [1, 2]\n")?;
        let working_dir = dir.path().to_str().unwrap();
        assert!(Config::from_options(options(&["-w", working_dir])?).is_err());
        Ok(())
    }
}
