//! Command implementations shared by CLI and MCP server.

use std::fmt::Write;
use std::path::Path;

use crate::config::Config;
use crate::corpus::{Corpus, Verse};
use crate::query::{self, CaseMode};
use crate::reference::Book;
use crate::search::{self, Hit, SearchOptions};

/// Maximum accepted length of a raw query string, in bytes.
pub const MAX_QUERY_LENGTH: usize = 1000;

/// The search cheat-sheet shown by `verseq guide`.
pub const SEARCH_GUIDE: &str = "\
SEARCH CHEAT-SHEET
------------------
  substring   : kingdom
  whole-word  : =love
  phrase      : \"living water\"
  regex       : /grace.*faith/
  AND         : love & joy
  OR          : mercy | grace
  combined    : =love & joy | \"living water\"
  case flags  : append :c (case-sensitive) or :i (ignore case)
  slash       : write a '/' inside a regex as \\/ or within [...]

AND binds tighter than OR; there are no parentheses.
Matching is case-insensitive unless the query ends with :c.
Use --context to print hits as plain '<reference>: <text>' lines.
";

/// Load the corpus at `path`, or at the configured location when `path` is None.
///
/// # Errors
///
/// Returns an error if the corpus fails to load. A corpus with any malformed
/// reference is rejected as a whole.
pub fn load_corpus(path: Option<&Path>, config: &Config) -> anyhow::Result<Corpus> {
    let path = path.map_or_else(|| config.corpus_path(), Path::to_path_buf);

    Corpus::load(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load corpus {}: {e}", path.display()))
}

/// Resolve user input such as "gen" or "1 kgs" to a canonical book.
///
/// # Errors
///
/// Returns an error if the input names no known book.
pub fn resolve_book(input: &str) -> anyhow::Result<Book> {
    Book::resolve(input).ok_or_else(|| anyhow::anyhow!("Book not found: {}", input.trim()))
}

/// Outcome of a search: the query form, its case mode and the hits.
///
/// `total` counts every matching verse; `hits` holds at most `limit` of them.
#[derive(Debug)]
pub struct SearchReport<'c> {
    pub label: &'static str,
    pub case_mode: CaseMode,
    pub total: usize,
    pub hits: Vec<Hit<'c>>,
}

impl SearchReport<'_> {
    /// Whether the limit dropped some matches.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.hits.len() < self.total
    }

    /// E.g. `Found 3 case-insensitive regex result(s):`, or
    /// `Found 120 case-insensitive substring result(s) (showing first 50):`.
    #[must_use]
    pub fn header(&self) -> String {
        let mut header = format!(
            "Found {} {} {} result(s)",
            self.total,
            self.case_mode.describe(),
            self.label
        );
        if self.is_truncated() {
            let _ = write!(header, " (showing first {})", self.hits.len());
        }
        header.push(':');
        header
    }
}

/// Compile and evaluate a query against a loaded corpus.
///
/// # Arguments
///
/// * `corpus` - The loaded corpus
/// * `raw_query` - Query in the search language (see [`SEARCH_GUIDE`])
/// * `limit` - Maximum number of hits to return; the total is counted regardless
/// * `book` - Optional book to restrict the search to (loose spelling allowed)
///
/// # Errors
///
/// Returns an error if the query is too long, fails to compile, or the book
/// filter names no known book. An empty result is not an error.
pub fn search<'c>(
    corpus: &'c Corpus,
    raw_query: &str,
    limit: Option<usize>,
    book: Option<&str>,
) -> anyhow::Result<SearchReport<'c>> {
    if raw_query.len() > MAX_QUERY_LENGTH {
        anyhow::bail!(
            "Query too long: {} bytes (max {MAX_QUERY_LENGTH})",
            raw_query.len()
        );
    }

    let book = book.map(resolve_book).transpose()?;
    let query = query::compile(raw_query)?;

    let options = SearchOptions { limit: None, book };
    let mut hits = search::search(&query, corpus, &options);
    let total = hits.len();
    if let Some(limit) = limit {
        hits.truncate(limit);
    }

    Ok(SearchReport {
        label: query.label(),
        case_mode: query.case_mode(),
        total,
        hits,
    })
}

/// Chapter numbers of a book.
///
/// # Errors
///
/// Returns an error if the book is unknown or absent from the corpus.
pub fn chapters(corpus: &Corpus, book: &str) -> anyhow::Result<(Book, Vec<u32>)> {
    let book = resolve_book(book)?;
    let chapters = corpus.list_chapters(book)?;
    Ok((book, chapters))
}

/// A chapter ready for display, with its neighbours in the same book.
#[derive(Debug)]
pub struct ChapterView<'c> {
    pub book: Book,
    pub chapter: u32,
    pub verses: &'c [Verse],
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl ChapterView<'_> {
    /// Plain-text context block: heading then `v. text` lines.
    #[must_use]
    pub fn context(&self) -> String {
        let mut out = format!("{} {}\n", self.book, self.chapter);
        for verse in self.verses {
            let _ = writeln!(out, "{}. {}", verse.locator.verse, verse.text);
        }
        out
    }
}

/// Fetch one chapter.
///
/// # Errors
///
/// Returns an error if the book is unknown or the chapter is not in the corpus.
pub fn read<'c>(corpus: &'c Corpus, book: &str, chapter: u32) -> anyhow::Result<ChapterView<'c>> {
    let book = resolve_book(book)?;
    let verses = corpus.chapter_verses(book, chapter)?;

    Ok(ChapterView {
        book,
        chapter,
        verses,
        prev: corpus.prev_chapter(book, chapter),
        next: corpus.next_chapter(book, chapter),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryError;

    fn corpus() -> Corpus {
        Corpus::from_entries([
            ("Genesis 1:1", "In the beginning God created the heaven and the earth."),
            ("Genesis 1:2", "And the earth was without form, and void;"),
            ("Genesis 2:1", "Thus the heavens and the earth were finished,"),
            ("Genesis 3:1", "Now the serpent was more subtil than any beast"),
            ("John 3:16", "For God so loved the world"),
        ])
        .unwrap()
    }

    mod search_tests {
        use super::*;

        #[test]
        fn report_header() {
            let corpus = corpus();
            let report = search(&corpus, "/earth/", None, None).unwrap();
            assert_eq!(report.hits.len(), 3);
            assert_eq!(report.header(), "Found 3 case-insensitive regex result(s):");

            let report = search(&corpus, "God & world:c", None, None).unwrap();
            assert_eq!(report.header(), "Found 1 case-sensitive AND result(s):");
        }

        #[test]
        fn header_counts_matches_beyond_limit() {
            let corpus = corpus();
            let report = search(&corpus, "earth", Some(1), None).unwrap();
            assert_eq!(report.total, 3);
            assert_eq!(report.hits.len(), 1);
            assert!(report.is_truncated());
            assert_eq!(
                report.header(),
                "Found 3 case-insensitive substring result(s) (showing first 1):"
            );

            let report = search(&corpus, "earth", Some(3), None).unwrap();
            assert!(!report.is_truncated());
            assert_eq!(report.header(), "Found 3 case-insensitive substring result(s):");
        }

        #[test]
        fn limit_and_book_filter() {
            let corpus = corpus();
            let report = search(&corpus, "god", Some(1), None).unwrap();
            assert_eq!(report.hits.len(), 1);
            assert_eq!(report.hits[0].locator.to_string(), "Genesis 1:1");

            let report = search(&corpus, "god", None, Some("jn")).unwrap();
            assert_eq!(report.hits.len(), 1);
            assert_eq!(report.hits[0].locator.to_string(), "John 3:16");
        }

        #[test]
        fn unknown_book_filter() {
            let err = search(&corpus(), "god", None, Some("Hezekiah")).unwrap_err();
            assert!(err.to_string().contains("Book not found"));
        }

        #[test]
        fn query_errors_surface() {
            let err = search(&corpus(), "/(/", None, None).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<QueryError>(),
                Some(QueryError::InvalidRegex { .. })
            ));
        }

        #[test]
        fn query_too_long() {
            let long_query = "a".repeat(MAX_QUERY_LENGTH + 1);
            let err = search(&corpus(), &long_query, None, None).unwrap_err();
            assert!(err.to_string().contains("too long"));
            assert!(err.to_string().contains("1001 bytes"));
        }

        #[test]
        fn no_matches_is_ok() {
            let corpus = corpus();
            let report = search(&corpus, "xyznonexistent", None, None).unwrap();
            assert!(report.hits.is_empty());
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn chapters_of_book() {
            let (book, chapters) = chapters(&corpus(), "gen").unwrap();
            assert_eq!(book.name(), "Genesis");
            assert_eq!(chapters, [1, 2, 3]);
        }

        #[test]
        fn chapters_of_absent_book() {
            let err = chapters(&corpus(), "Exodus").unwrap_err();
            assert!(err.to_string().contains("Book not found: Exodus"));
        }

        #[test]
        fn read_with_neighbours() {
            let corpus = corpus();
            let view = read(&corpus, "Genesis", 2).unwrap();
            assert_eq!(view.verses.len(), 1);
            assert_eq!(view.prev, Some(1));
            assert_eq!(view.next, Some(3));

            let view = read(&corpus, "Genesis", 1).unwrap();
            assert_eq!(view.prev, None);
            assert_eq!(
                view.context(),
                "Genesis 1\n\
                 1. In the beginning God created the heaven and the earth.\n\
                 2. And the earth was without form, and void;\n"
            );
        }

        #[test]
        fn read_missing_chapter() {
            let err = read(&corpus(), "Genesis", 9).unwrap_err();
            assert!(err.to_string().contains("Chapter not found: Genesis 9"));
        }
    }

    #[test]
    fn load_corpus_missing_file() {
        let err = load_corpus(Some(Path::new("/nonexistent/verses.json")), &Config::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load corpus"));
    }

    #[test]
    fn load_corpus_from_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("verses.json");
        std::fs::write(&path, r#"{"Jude 1:1": "Jude, the servant of Jesus Christ"}"#).unwrap();

        let mut config = Config::default();
        config.corpus.path = path.display().to_string();

        let corpus = load_corpus(None, &config).unwrap();
        assert_eq!(corpus.len(), 1);
    }
}
