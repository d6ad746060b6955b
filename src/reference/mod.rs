//! Verse references of the form `"Book Chapter:Verse"`.

pub mod books;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

pub use books::{Book, CANONICAL_BOOKS};

/// Errors produced when a reference key is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Malformed reference '{0}': expected '<Book> <Chapter>:<Verse>'")]
    MissingSpace(String),

    #[error("Malformed reference '{0}': missing ':' between chapter and verse")]
    MissingColon(String),

    #[error("Malformed reference '{key}': '{part}' is not a positive integer")]
    InvalidNumber { key: String, part: String },

    #[error("Malformed reference '{key}': unknown book '{book}'")]
    UnknownBook { key: String, book: String },
}

/// Structured address of a single verse.
///
/// Ordering is corpus order: canonical book, then chapter, then verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Locator {
    pub book: Book,
    pub chapter: u32,
    pub verse: u32,
}

impl Locator {
    /// Parse a corpus key such as `"1 Samuel 3:10"`.
    ///
    /// The book name must match a canonical spelling exactly.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError` if the key has no space, no `:`, a chapter or
    /// verse that is not a positive integer, or an unknown book.
    pub fn parse(key: &str) -> Result<Self, ReferenceError> {
        let (book_name, chapter_verse) = key
            .rsplit_once(' ')
            .ok_or_else(|| ReferenceError::MissingSpace(key.to_string()))?;

        let (chapter, verse) = chapter_verse
            .split_once(':')
            .ok_or_else(|| ReferenceError::MissingColon(key.to_string()))?;

        let chapter = parse_positive(key, chapter)?;
        let verse = parse_positive(key, verse)?;

        let book = Book::from_name(book_name).ok_or_else(|| ReferenceError::UnknownBook {
            key: key.to_string(),
            book: book_name.to_string(),
        })?;

        Ok(Self {
            book,
            chapter,
            verse,
        })
    }
}

/// Accept only plain decimal digits without a leading zero, so that every
/// parsed key formats back to itself.
fn parse_positive(key: &str, part: &str) -> Result<u32, ReferenceError> {
    let invalid = || ReferenceError::InvalidNumber {
        key: key.to_string(),
        part: part.to_string(),
    };

    if part.is_empty() || part.starts_with('0') || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    part.parse().map_err(|_| invalid())
}

impl FromStr for Locator {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// Serializes as the formatted key, e.g. `"John 3:16"`.
impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
