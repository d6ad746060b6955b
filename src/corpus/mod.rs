//! In-memory verse corpus with book and chapter navigation.

use std::collections::BTreeMap;
use std::fs;
use std::ops::{Bound, Range};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::reference::{Book, Locator, ReferenceError};

/// Errors that can occur when loading a corpus. Any of these aborts the load.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Corpus file not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read corpus: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse corpus: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Corpus contains {} malformed reference(s): {}", .0.len(), summarize(.0))]
    MalformedReferences(Vec<ReferenceError>),

    #[error("Corpus contains duplicate reference '{0}'")]
    DuplicateReference(Locator),
}

fn summarize(errors: &[ReferenceError]) -> String {
    const SHOWN: usize = 3;

    let mut parts: Vec<String> = errors.iter().take(SHOWN).map(ToString::to_string).collect();
    if errors.len() > SHOWN {
        parts.push(format!("and {} more", errors.len() - SHOWN));
    }
    parts.join("; ")
}

/// Errors for navigation requests outside the loaded corpus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Book not found: {0}")]
    UnknownBook(String),

    #[error("Chapter not found: {book} {chapter}")]
    UnknownChapter { book: String, chapter: u32 },
}

/// A single verse with its reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verse {
    #[serde(rename = "reference")]
    pub locator: Locator,
    pub text: String,
}

/// A loaded, read-only verse corpus.
///
/// Verses are held in corpus order (canonical book, chapter, verse). The
/// chapter index maps every (book, chapter) to a contiguous slice of verses.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    verses: Vec<Verse>,
    chapters: BTreeMap<Book, BTreeMap<u32, Range<usize>>>,
}

impl Corpus {
    /// Load a corpus from a JSON file mapping `"Book Chapter:Verse"` keys to
    /// verse text.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::NotFound` if the file doesn't exist.
    /// Returns `CorpusError::ReadError` if the file cannot be read.
    /// Returns `CorpusError::ParseError` if the JSON is not a string map.
    /// Returns `CorpusError::MalformedReferences` if any key fails to parse.
    /// Returns `CorpusError::DuplicateReference` if two keys name the same verse.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        if !path.exists() {
            return Err(CorpusError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let raw: BTreeMap<String, String> = serde_json::from_str(&contents)?;
        let corpus = Self::from_entries(raw)?;

        debug!(
            path = %path.display(),
            verses = corpus.len(),
            books = corpus.chapters.len(),
            "loaded corpus"
        );
        Ok(corpus)
    }

    /// Build a corpus from raw key/text pairs in any order.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::MalformedReferences` listing every key that fails
    /// to parse, or `CorpusError::DuplicateReference` for a repeated verse.
    pub fn from_entries<I, K, T>(entries: I) -> Result<Self, CorpusError>
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: Into<String>,
    {
        let mut verses = Vec::new();
        let mut errors = Vec::new();

        for (key, text) in entries {
            match Locator::parse(key.as_ref()) {
                Ok(locator) => verses.push(Verse {
                    locator,
                    text: text.into(),
                }),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(CorpusError::MalformedReferences(errors));
        }

        verses.sort_by_key(|v| v.locator);

        if let Some(pair) = verses
            .windows(2)
            .find(|pair| pair[0].locator == pair[1].locator)
        {
            return Err(CorpusError::DuplicateReference(pair[0].locator));
        }

        let chapters = build_chapter_index(&verses);
        Ok(Self { verses, chapters })
    }

    /// Books present in the corpus, in canonical order.
    #[must_use]
    pub fn list_books(&self) -> Vec<Book> {
        self.chapters.keys().copied().collect()
    }

    /// Chapter numbers of a book, ascending.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::UnknownBook` if the book has no verses.
    pub fn list_chapters(&self, book: Book) -> Result<Vec<u32>, LookupError> {
        self.chapters
            .get(&book)
            .map(|chapters| chapters.keys().copied().collect())
            .ok_or_else(|| LookupError::UnknownBook(book.name().to_string()))
    }

    /// Verses of one chapter, ascending by verse number.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::UnknownBook` or `LookupError::UnknownChapter`
    /// when the chapter is not in the corpus.
    pub fn chapter_verses(&self, book: Book, chapter: u32) -> Result<&[Verse], LookupError> {
        let chapters = self
            .chapters
            .get(&book)
            .ok_or_else(|| LookupError::UnknownBook(book.name().to_string()))?;

        let range = chapters
            .get(&chapter)
            .ok_or_else(|| LookupError::UnknownChapter {
                book: book.name().to_string(),
                chapter,
            })?;

        Ok(&self.verses[range.clone()])
    }

    /// Every verse of one book, in order.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::UnknownBook` if the book has no verses.
    pub fn book_verses(&self, book: Book) -> Result<&[Verse], LookupError> {
        let chapters = self
            .chapters
            .get(&book)
            .ok_or_else(|| LookupError::UnknownBook(book.name().to_string()))?;

        let start = chapters.values().map(|r| r.start).min().unwrap_or(0);
        let end = chapters.values().map(|r| r.end).max().unwrap_or(0);
        Ok(&self.verses[start..end])
    }

    /// The chapter after `chapter` in the same book, if any.
    #[must_use]
    pub fn next_chapter(&self, book: Book, chapter: u32) -> Option<u32> {
        self.chapters
            .get(&book)?
            .range((Bound::Excluded(chapter), Bound::Unbounded))
            .next()
            .map(|(c, _)| *c)
    }

    /// The chapter before `chapter` in the same book, if any.
    #[must_use]
    pub fn prev_chapter(&self, book: Book, chapter: u32) -> Option<u32> {
        self.chapters
            .get(&book)?
            .range(..chapter)
            .next_back()
            .map(|(c, _)| *c)
    }

    /// Look up a single verse.
    #[must_use]
    pub fn verse(&self, locator: &Locator) -> Option<&Verse> {
        self.verses
            .binary_search_by_key(locator, |v| v.locator)
            .ok()
            .map(|i| &self.verses[i])
    }

    /// All verses in corpus order.
    #[must_use]
    pub fn all_verses(&self) -> &[Verse] {
        &self.verses
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

/// Group sorted verses into per-chapter index ranges.
fn build_chapter_index(verses: &[Verse]) -> BTreeMap<Book, BTreeMap<u32, Range<usize>>> {
    let mut index: BTreeMap<Book, BTreeMap<u32, Range<usize>>> = BTreeMap::new();

    for (i, verse) in verses.iter().enumerate() {
        let loc = verse.locator;
        index
            .entry(loc.book)
            .or_default()
            .entry(loc.chapter)
            .and_modify(|r| r.end = i + 1)
            .or_insert(i..i + 1);
    }

    index
}
