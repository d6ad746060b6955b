//! Query evaluation over a verse corpus.
//!
//! Hits are returned in corpus order. There is no scoring or re-sorting.

pub mod matcher;

use std::fmt::Write;

use serde::Serialize;
use tracing::{debug, warn};

use crate::corpus::{Corpus, Verse};
use crate::query::Query;
use crate::reference::{Book, Locator};

pub use matcher::Matcher;

/// Options for filtering and limiting search results.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub limit: Option<usize>,
    /// Restrict the scan to a single book.
    pub book: Option<Book>,
}

/// A verse that satisfied a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hit<'c> {
    #[serde(rename = "reference")]
    pub locator: Locator,
    pub text: &'c str,
}

impl<'c> From<&'c Verse> for Hit<'c> {
    fn from(verse: &'c Verse) -> Self {
        Self {
            locator: verse.locator,
            text: &verse.text,
        }
    }
}

/// Evaluate a compiled query against every verse of the corpus.
///
/// Returns an empty vector when nothing matches.
#[must_use]
pub fn evaluate<'c>(query: &Query, corpus: &'c Corpus) -> Vec<Hit<'c>> {
    search(query, corpus, &SearchOptions::default())
}

/// Evaluate a compiled query with an optional book filter and result limit.
///
/// A book that is not in the corpus yields no hits and a warning.
#[must_use]
pub fn search<'c>(query: &Query, corpus: &'c Corpus, options: &SearchOptions) -> Vec<Hit<'c>> {
    let verses = match options.book {
        Some(book) => corpus.book_verses(book).unwrap_or_else(|e| {
            warn!(book = %book, "book filter matches no verses: {e}");
            &[]
        }),
        None => corpus.all_verses(),
    };

    let matcher = Matcher::new(query);
    let hits = verses
        .iter()
        .filter(|v| matcher.matches(&v.text))
        .map(Hit::from);

    let hits: Vec<Hit<'c>> = match options.limit {
        Some(limit) => hits.take(limit).collect(),
        None => hits.collect(),
    };

    debug!(
        query = %query,
        scanned = verses.len(),
        hits = hits.len(),
        "evaluated query"
    );
    hits
}

/// Render hits as a plain context block, one `<reference>: <text>` line per
/// hit, for handing to a summarizer.
#[must_use]
pub fn format_context(hits: &[Hit<'_>]) -> String {
    let mut out = String::new();
    for hit in hits {
        let _ = writeln!(out, "{}: {}", hit.locator, hit.text);
    }
    out
}
