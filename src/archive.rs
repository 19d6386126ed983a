//! Groups entries into the year → month → entry structure rendered on the
//! archive page.
//!
//! Grouping is done in two phases: entries are first bucketed by their
//! `(year, month)` key, then the buckets are sorted and folded into the
//! read-only [`TemporalIndex`]. Months are compared by their calendar number
//! via [`Month`], never by name.

use crate::entry::Entry;
use crate::sort::sort_newest_first;
use chrono::Datelike;
use std::collections::HashMap;
use std::fmt;

/// A calendar month. The derived ordering is calendar order, so
/// `Month::January < Month::April`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

impl Month {
    /// Returns the month with calendar number `n` (1 = January).
    pub fn from_number(n: u32) -> Option<Month> {
        match n {
            1..=12 => Some(MONTHS[n as usize - 1]),
            _ => None,
        }
    }

    /// Returns the month in which `date` falls.
    pub fn of<D: Datelike>(date: &D) -> Month {
        // `month0` is always in 0..12.
        MONTHS[date.month0() as usize]
    }

    /// The calendar number, 1 through 12.
    pub fn number(self) -> u32 {
        self as u32
    }

    /// The English name of the month.
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The entries created in one calendar month, newest first.
#[derive(Debug)]
pub struct MonthGroup<'a> {
    pub month: Month,
    pub entries: Vec<&'a Entry>,
}

impl MonthGroup<'_> {
    pub fn name(&self) -> &'static str {
        self.month.name()
    }
}

/// The months of one year that have entries, newest month first.
#[derive(Debug)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub months: Vec<MonthGroup<'a>>,
}

impl<'a> YearGroup<'a> {
    /// The year as displayed, e.g. `"2023"`.
    pub fn label(&self) -> String {
        self.year.to_string()
    }

    /// Iterates over the year's entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &'a Entry> + '_ {
        self.months.iter().flat_map(|m| m.entries.iter().copied())
    }
}

/// Entries partitioned by creation year and month. Years are newest first,
/// months within a year are newest first, and entries within a month are
/// newest first. Every entry the index was built from appears exactly once.
#[derive(Debug, Default)]
pub struct TemporalIndex<'a> {
    years: Vec<YearGroup<'a>>,
}

impl<'a> TemporalIndex<'a> {
    /// Builds the index. `entries` need not be sorted; ties within a month
    /// keep their input order.
    pub fn build<I>(entries: I) -> TemporalIndex<'a>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut buckets: HashMap<(i32, Month), Vec<&'a Entry>> = HashMap::new();
        for entry in entries {
            buckets
                .entry((entry.created.year(), Month::of(&entry.created)))
                .or_default()
                .push(entry);
        }

        let mut buckets: Vec<((i32, Month), Vec<&'a Entry>)> = buckets.into_iter().collect();
        buckets.sort_unstable_by(|(a, _), (b, _)| b.cmp(a));

        let mut years: Vec<YearGroup<'a>> = Vec::new();
        for ((year, month), mut entries) in buckets {
            sort_newest_first(&mut entries);
            let group = MonthGroup { month, entries };
            match years.last_mut() {
                Some(current) if current.year == year => current.months.push(group),
                _ => years.push(YearGroup {
                    year,
                    months: vec![group],
                }),
            }
        }

        TemporalIndex { years }
    }

    pub fn years(&self) -> &[YearGroup<'a>] {
        &self.years
    }

    /// Lazily walks every entry in year → month → entry order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Entry> + '_ {
        self.years
            .iter()
            .flat_map(|y| y.months.iter())
            .flat_map(|m| m.entries.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.years
            .iter()
            .flat_map(|y| y.months.iter())
            .map(|m| m.entries.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}
