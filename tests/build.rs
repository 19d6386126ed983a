use chrono::{NaiveDate, TimeZone, Utc};
use quire::build::{build_site_at, Error, FEED_FILE};
use quire::config::{Author, Config};
use quire::write::{Error as WriteError, TEMPLATE_NAMES};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use url::Url;

const TEMPLATES: [(&str, &str); 6] = [
    ("about", "<p>About, generated {{.cdate}}</p>"),
    (
        "archive",
        "{{range .years}}<h2>{{.year}}</h2>{{range .months}}<h3>{{.month}}</h3>{{range .entries}}<li>{{.title}}</li>{{end}}{{end}}{{end}}",
    ),
    (
        "entries",
        "{{range .entries}}<article><a href=\"{{.url}}\">{{.title}}</a>{{.summary}}</article>{{end}}",
    ),
    (
        "entry",
        "<h1>{{.title}}</h1><p>{{.cdate}}</p>{{if .udate}}<p>updated {{.udate}}</p>{{end}}{{.content}}{{if .older}}<a rel=\"prev\" href=\"{{.older.url}}\">{{.older.title}}</a>{{end}}",
    ),
    (
        "site",
        "<html><head><title>{{.title}} | {{.site_title}}</title></head><body>{{if .at_home}}<nav>home</nav>{{end}}{{.content}}</body></html>",
    ),
    (
        "tags",
        "{{range .tags}}<h2 id=\"{{.anchor}}\">{{.name}}</h2>{{range .entries}}<li>{{.title}}</li>{{end}}{{end}}",
    ),
];

const ENTRIES: [(&str, &str); 4] = [
    (
        "go-intro.md",
        "---\nTitle: Go Intro\nDate: 2023-01-05\nTags: [go]\n---\nHello, *Go*.\n",
    ),
    (
        "go-web.md",
        "---\nTitle: Go Web\nDate: 2023-01-20\nTags: [go, web]\n---\nServing.\n\n<!-- more -->\n\nDetails.\n",
    ),
    (
        "web-march.md",
        "---\nTitle: Web March\nDate: 2023-03-01\nUpdated: 2023-03-04\nTags: [web]\n---\nMarch.\n",
    ),
    (
        "winter.md",
        "---\nTitle: Winter\nDate: 2022-12-15\n---\nCold.\n",
    ),
];

fn fixture() -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("templates")).unwrap();
    for (name, body) in TEMPLATES.iter() {
        fs::write(root.join("templates").join(format!("{}.html", name)), body).unwrap();
    }

    fs::create_dir_all(root.join("blogs")).unwrap();
    for (name, body) in ENTRIES.iter() {
        fs::write(root.join("blogs").join(name), body).unwrap();
    }

    fs::create_dir_all(root.join("static/css")).unwrap();
    fs::write(root.join("static/css/site.css"), "body {}").unwrap();

    let config = Config {
        title: String::from("Field Notes"),
        description: String::from("A test site"),
        author: Some(Author {
            name: String::from("Jo"),
            email: None,
        }),
        site_url: Url::parse("https://example.org/").unwrap(),
        output_directory: root.join("public"),
        empty_output_directory: false,
        template_directory: root.join("templates"),
        blog_directory: root.join("blogs"),
        static_directory: root.join("static"),
        index_entries: 2,
        feed_entries: 3,
    };
    (dir, config)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
}

fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut offset = 0;
    for needle in needles {
        match haystack[offset..].find(needle) {
            Some(i) => offset += i + needle.len(),
            None => panic!("`{}` missing or out of order in:\n{}", needle, haystack),
        }
    }
}

fn build(config: &Config) -> Result<(), Error> {
    let now = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    build_site_at(config, Utc.from_utc_datetime(&now))
}

#[test]
fn test_build_site() {
    let (_dir, config) = fixture();
    build(&config).unwrap();
    let out = &config.output_directory;

    let archive = read(&out.join("archives.html"));
    assert!(archive.starts_with("<html><head><title>Archives | Field Notes</title>"));
    assert_in_order(
        &archive,
        &[
            "<h2>2023</h2>",
            "<h3>March</h3>",
            "<li>Web March</li>",
            "<h3>January</h3>",
            "<li>Go Web</li>",
            "<li>Go Intro</li>",
            "<h2>2022</h2>",
            "<h3>December</h3>",
            "<li>Winter</li>",
        ],
    );

    let tags = read(&out.join("tags.html"));
    assert_in_order(
        &tags,
        &[
            "<h2 id=\"go\">go</h2>",
            "<li>Go Web</li>",
            "<li>Go Intro</li>",
            "<h2 id=\"web\">web</h2>",
            "<li>Web March</li>",
            "<li>Go Web</li>",
        ],
    );
    assert!(!tags.contains("Winter"));

    let index = read(&out.join("index.html"));
    assert!(index.contains("<nav>home</nav>"));
    assert_in_order(&index, &["Web March", "Go Web"]);
    assert!(!index.contains("Go Intro"));
    assert!(index.contains("Serving."));
    assert!(!index.contains("Details."));

    let entry = read(&out.join("web-march.html"));
    assert!(entry.contains("<h1>Web March</h1>"));
    assert!(entry.contains("<p>2023-03-01</p>"));
    assert!(entry.contains("<p>updated 2023-03-04</p>"));
    assert!(entry.contains("<a rel=\"prev\" href=\"go-web.html\">Go Web</a>"));
    assert!(!entry.contains("<nav>home</nav>"));

    let oldest = read(&out.join("winter.html"));
    assert!(!oldest.contains("rel=\"prev\""));

    let about = read(&out.join("about.html"));
    assert!(about.contains("generated 2024-06-01"));

    assert!(out.join("css/site.css").is_file());

    let feed = read(&out.join(FEED_FILE));
    assert_in_order(
        &feed,
        &[
            "https://example.org/web-march.html",
            "https://example.org/go-web.html",
            "https://example.org/go-intro.html",
        ],
    );
    assert!(!feed.contains("winter.html"));
}

#[test]
fn test_empty_output_directory() {
    let (_dir, mut config) = fixture();
    fs::create_dir_all(&config.output_directory).unwrap();
    let stale = config.output_directory.join("stale.html");
    fs::write(&stale, "old").unwrap();

    build(&config).unwrap();
    assert!(stale.exists());

    config.empty_output_directory = true;
    build(&config).unwrap();
    assert!(!stale.exists());
    assert!(config.output_directory.join("index.html").is_file());
}

#[test]
fn test_empty_blog() {
    let (dir, config) = fixture();
    for (name, _) in ENTRIES.iter() {
        fs::remove_file(dir.path().join("blogs").join(name)).unwrap();
    }
    build(&config).unwrap();
    assert!(config.output_directory.join("index.html").is_file());
    assert!(config.output_directory.join("archives.html").is_file());
    assert!(config.output_directory.join(FEED_FILE).is_file());
}

#[test]
fn test_missing_template_fails_before_writing() {
    let (dir, config) = fixture();
    fs::remove_file(dir.path().join("templates").join(format!("{}.html", TEMPLATE_NAMES[4])))
        .unwrap();
    match build(&config) {
        Err(Error::Write(WriteError::OpenTemplateFile { path, .. })) => {
            assert!(path.ends_with("site.html"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!config.output_directory.exists());
}

#[test]
fn test_invalid_entry_date_fails() {
    let (dir, config) = fixture();
    fs::write(
        dir.path().join("blogs").join("bad.md"),
        "---\nTitle: Bad\nDate: not a date\n---\n",
    )
    .unwrap();
    match build(&config) {
        Err(e @ Error::Parse(_)) => assert!(e.to_string().contains("bad.md")),
        other => panic!("unexpected result: {:?}", other),
    }
}
