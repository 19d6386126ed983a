use crate::archive::TemporalIndex;
use crate::corpus::Corpus;
use crate::entry::Entry;
use crate::tag::TagIndex;
use gtmpl::{Context, Template, Value};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The templates every theme must provide, by file stem.
pub const TEMPLATE_NAMES: [&str; 6] = ["about", "archive", "entries", "entry", "site", "tags"];

const TEMPLATE_EXTENSION: &str = "html";

/// The templates in the order of [`TEMPLATE_NAMES`].
#[derive(Clone, Copy, Debug)]
enum Kind {
    About,
    Archive,
    Entries,
    Entry,
    Site,
    Tags,
}

impl Kind {
    fn name(self) -> &'static str {
        TEMPLATE_NAMES[self as usize]
    }
}

/// The parsed theme templates. `site` wraps the output of every other
/// template.
pub struct Templates(Vec<Template>);

impl Templates {
    /// Loads `{name}.html` for each of [`TEMPLATE_NAMES`] from `dir`. All of
    /// them must exist.
    pub fn load(dir: &Path) -> Result<Templates> {
        TEMPLATE_NAMES
            .iter()
            .map(|name| load_template(dir, name))
            .collect::<Result<Vec<Template>>>()
            .map(Templates)
    }

    fn render(&self, kind: Kind, value: Value) -> Result<String> {
        // `load` fills every slot, so the index is in bounds
        execute(&self.0[kind as usize], kind.name(), value)
    }
}

fn load_template(dir: &Path, name: &str) -> Result<Template> {
    let path = dir.join(name).with_extension(TEMPLATE_EXTENSION);
    let mut contents = String::new();
    File::open(&path)
        .and_then(|mut f| f.read_to_string(&mut contents))
        .map_err(|err| Error::OpenTemplateFile {
            path: path.clone(),
            err,
        })?;

    let mut template = Template::default();
    template
        .parse(&contents)
        .map_err(|err| Error::ParseTemplate {
            name: name.to_owned(),
            err,
        })?;
    Ok(template)
}

/// Which section of the site a page belongs to, for navigation highlighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Home,
    Tags,
    Archives,
    About,
    Entry,
}

/// The values handed to `site.html` for every page.
struct SiteData<'a> {
    title: &'a str,
    description: &'a str,
    author: &'a str,
    content: String,
    languages: Vec<String>,
    section: Section,
}

/// Responsible for templating and writing every HTML page to disk from a
/// [`Corpus`].
pub struct Writer<'a> {
    pub templates: &'a Templates,

    /// The directory pages are written into. Entry pages land at
    /// `{output_directory}/{entry.url}`.
    pub output_directory: &'a Path,

    /// The site's title, available to `site.html` as `site_title`.
    pub site_title: &'a str,

    /// The site's description, used for pages without their own.
    pub site_description: &'a str,

    /// The date the site was generated, available to the `about`, `tags`,
    /// and `archive` templates as `cdate`.
    pub generated: &'a str,
}

impl Writer<'_> {
    /// Writes an entry page for every entry, then `about.html`,
    /// `tags.html`, `archives.html`, and `index.html`.
    pub fn write_site(&self, corpus: &Corpus) -> Result<()> {
        let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
        for (i, entry) in corpus.by_date.iter().enumerate() {
            let (newer, older) = corpus.neighbors(i);
            let file_path = self.output_directory.join(&entry.url);
            if let Some(dir) = file_path.parent() {
                if seen_dirs.insert(dir.to_owned()) {
                    fs::create_dir_all(dir).map_err(|err| Error::Write {
                        path: dir.to_owned(),
                        err,
                    })?;
                }
            }
            self.write_entry(&file_path, entry, newer, older)?;
        }
        debug!(count = corpus.by_date.len(), "wrote entry pages");

        self.write_about()?;
        self.write_tags(&corpus.tags)?;
        self.write_archive(&corpus.archive)?;
        self.write_index(&corpus.index)
    }

    fn write_entry(
        &self,
        file_path: &Path,
        entry: &Entry,
        newer: Option<&Entry>,
        older: Option<&Entry>,
    ) -> Result<()> {
        let neighbor = |e: Option<&Entry>| match e {
            Some(e) => Value::from(e),
            None => Value::Nil,
        };

        let mut value = Value::from(entry);
        if let Value::Object(obj) = &mut value {
            obj.insert("newer".to_owned(), neighbor(newer));
            obj.insert("older".to_owned(), neighbor(older));
        }

        let content = self.templates.render(Kind::Entry, value)?;
        self.write_page(
            file_path,
            SiteData {
                title: &entry.title,
                description: &entry.description,
                author: &entry.author,
                content,
                languages: entry.languages.clone(),
                section: Section::Entry,
            },
        )
    }

    fn write_about(&self) -> Result<()> {
        let content = self.templates.render(Kind::About, self.dated(HashMap::new()))?;
        self.write_page(
            &self.output_directory.join("about.html"),
            self.section_page("About", content, Section::About),
        )
    }

    fn write_tags(&self, tags: &TagIndex) -> Result<()> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("tags".to_owned(), Value::Array(tag_values(tags)));
        let content = self.templates.render(Kind::Tags, self.dated(m))?;
        self.write_page(
            &self.output_directory.join("tags.html"),
            self.section_page("Tags", content, Section::Tags),
        )
    }

    fn write_archive(&self, archive: &TemporalIndex) -> Result<()> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "years".to_owned(),
            Value::Array(archive.years().iter().map(Value::from).collect()),
        );
        let content = self.templates.render(Kind::Archive, self.dated(m))?;
        self.write_page(
            &self.output_directory.join("archives.html"),
            self.section_page("Archives", content, Section::Archives),
        )
    }

    fn write_index(&self, entries: &[&Entry]) -> Result<()> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "entries".to_owned(),
            Value::Array(entries.iter().map(|e| Value::from(*e)).collect()),
        );
        let content = self.templates.render(Kind::Entries, Value::Object(m))?;

        let mut page = self.section_page("Index", content, Section::Home);
        page.languages = languages(entries);
        self.write_page(&self.output_directory.join("index.html"), page)
    }

    fn section_page(&self, title: &'static str, content: String, section: Section) -> SiteData {
        SiteData {
            title,
            description: self.site_description,
            author: "",
            content,
            languages: Vec::new(),
            section,
        }
    }

    fn dated(&self, mut m: HashMap<String, Value>) -> Value {
        m.insert("cdate".to_owned(), Value::String(self.generated.to_owned()));
        Value::Object(m)
    }

    /// Wraps a page's content in `site.html` and writes it to `file_path`.
    fn write_page(&self, file_path: &Path, data: SiteData) -> Result<()> {
        let string = |s: &str| Value::String(s.to_owned());
        let flag = |section: Section| Value::Bool(data.section == section);

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("site_title".to_owned(), string(self.site_title));
        m.insert("title".to_owned(), string(data.title));
        m.insert("description".to_owned(), string(data.description));
        m.insert("author".to_owned(), string(data.author));
        m.insert(
            "languages".to_owned(),
            Value::Array(data.languages.iter().map(|l| string(l)).collect()),
        );
        m.insert("at_home".to_owned(), flag(Section::Home));
        m.insert("at_tags".to_owned(), flag(Section::Tags));
        m.insert("at_archives".to_owned(), flag(Section::Archives));
        m.insert("at_about".to_owned(), flag(Section::About));
        m.insert("content".to_owned(), Value::String(data.content.clone()));

        let page = self.templates.render(Kind::Site, Value::Object(m))?;
        File::create(file_path)
            .and_then(|mut f| f.write_all(page.as_bytes()))
            .map_err(|err| Error::Write {
                path: file_path.to_owned(),
                err,
            })?;
        debug!(path = %file_path.display(), "wrote page");
        Ok(())
    }
}

/// Each tag's value with an `anchor` for its heading: the tag's slug,
/// suffixed with a counter where two names slug alike (`C` and `C++`).
fn tag_values(tags: &TagIndex) -> Vec<Value> {
    let mut seen: HashSet<String> = HashSet::new();
    tags.tags()
        .iter()
        .map(|tag| {
            let slug = slug::slugify(tag.name);
            let mut anchor = slug.clone();
            let mut n = 2;
            while !seen.insert(anchor.clone()) {
                anchor = format!("{}-{}", slug, n);
                n += 1;
            }
            let mut value = Value::from(tag);
            if let Value::Object(obj) = &mut value {
                obj.insert("anchor".to_owned(), Value::String(anchor));
            }
            value
        })
        .collect()
}

/// The languages used by `entries`, de-duplicated, in first-seen order.
fn languages(entries: &[&Entry]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    entries
        .iter()
        .flat_map(|e| e.languages.iter())
        .filter(|l| seen.insert(l.as_str()))
        .cloned()
        .collect()
}

/// Renders `template` against `value` into a string.
fn execute(template: &Template, name: &str, value: Value) -> Result<String> {
    let render = || -> std::result::Result<String, String> {
        let mut buf: Vec<u8> = Vec::new();
        template.execute(&mut buf, &Context::from(value)?)?;
        String::from_utf8(buf).map_err(|e| e.to_string())
    };
    render().map_err(|err| Error::Template {
        name: name.to_owned(),
        err,
    })
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned for I/O problems while reading template files.
    #[error("opening template file `{}`", .path.display())]
    OpenTemplateFile {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    /// Returned for errors parsing template files.
    #[error("parsing template `{name}`: {err}")]
    ParseTemplate { name: String, err: String },

    /// Returned for errors executing a template.
    #[error("rendering template `{name}`: {err}")]
    Template { name: String, err: String },

    /// Returned for errors writing the output files.
    #[error("writing `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
}
