//! The library code for the `quire` static blog generator. The architecture
//! can be generally broken down into three distinct steps:
//!
//! 1. Parsing entries from source files on disk ([`crate::parser`])
//! 2. Aggregating the entries into views ([`crate::corpus`])
//! 3. Rendering the views into output files on disk ([`crate::write`],
//!    [`crate::feed`])
//!
//! The second step is the interesting one. From a single unordered slice of
//! [`entry::Entry`] values it derives a newest-first sequence
//! ([`crate::sort`]), a year → month → entry grouping for the archive page
//! ([`crate::archive`]), a tag → entry grouping for the tags page
//! ([`crate::tag`]), and bounded "most recent" slices for the home page and
//! the feed ([`crate::recent`]). Every view borrows from the same entries and
//! none of them is mutated once built.
//!
//! [`crate::build::build_site`] runs all three steps.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod archive;
pub mod build;
pub mod config;
pub mod corpus;
pub mod entry;
pub mod feed;
pub mod parser;
pub mod recent;
pub mod sort;
pub mod tag;
mod value;
pub mod write;
