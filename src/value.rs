//! Conversions from the crate's types into [`Value`]s for templating.

use crate::archive::{MonthGroup, YearGroup};
use crate::entry::Entry;
use crate::tag::Tag;
use chrono::NaiveDateTime;
use gtmpl::Value;
use std::collections::HashMap;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn string(s: &str) -> Value {
    Value::String(s.to_owned())
}

fn array<'a, I: IntoIterator<Item = &'a Entry>>(entries: I) -> Value {
    Value::Array(entries.into_iter().map(Value::from).collect())
}

impl From<&Entry> for Value {
    /// Exposes `title`, `url`, `cdate`, `udate` (nil if never updated),
    /// `description`, `author`, `tags`, `content`, `summary`, and
    /// `summarized`.
    fn from(e: &Entry) -> Value {
        let (summary, summarized) = e.summary();
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), string(&e.title));
        m.insert("url".to_owned(), string(&e.url));
        m.insert("cdate".to_owned(), Value::String(format_date(&e.created)));
        m.insert(
            "udate".to_owned(),
            match &e.updated {
                Some(updated) => Value::String(format_date(updated)),
                None => Value::Nil,
            },
        );
        m.insert("description".to_owned(), string(&e.description));
        m.insert("author".to_owned(), string(&e.author));
        m.insert(
            "tags".to_owned(),
            Value::Array(e.tags.iter().map(|t| string(t)).collect()),
        );
        m.insert("content".to_owned(), string(&e.body));
        m.insert("summary".to_owned(), string(summary));
        m.insert("summarized".to_owned(), Value::Bool(summarized));
        Value::Object(m)
    }
}

impl From<&Tag<'_>> for Value {
    fn from(t: &Tag) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), string(t.name));
        m.insert("entries".to_owned(), array(t.entries.iter().copied()));
        Value::Object(m)
    }
}

impl From<&MonthGroup<'_>> for Value {
    fn from(g: &MonthGroup) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("month".to_owned(), string(g.name()));
        m.insert("entries".to_owned(), array(g.entries.iter().copied()));
        Value::Object(m)
    }
}

impl From<&YearGroup<'_>> for Value {
    fn from(g: &YearGroup) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("year".to_owned(), Value::String(g.label()));
        m.insert(
            "months".to_owned(),
            Value::Array(g.months.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}
