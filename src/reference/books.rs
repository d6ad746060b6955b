//! The canonical book list and loose book-name resolution.

use std::fmt;

/// Canonical book names in corpus order.
pub const CANONICAL_BOOKS: [&str; 66] = [
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Solomon",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

/// Common abbreviations, keyed by the normalized (lowercase, single-spaced,
/// arabic-numbered) form of the user input.
const ALIASES: &[(&str, &str)] = &[
    ("gen", "Genesis"),
    ("ge", "Genesis"),
    ("gn", "Genesis"),
    ("ex", "Exodus"),
    ("exo", "Exodus"),
    ("exod", "Exodus"),
    ("lev", "Leviticus"),
    ("lv", "Leviticus"),
    ("num", "Numbers"),
    ("nm", "Numbers"),
    ("nu", "Numbers"),
    ("deut", "Deuteronomy"),
    ("dt", "Deuteronomy"),
    ("deu", "Deuteronomy"),
    ("jos", "Joshua"),
    ("josh", "Joshua"),
    ("jdg", "Judges"),
    ("judg", "Judges"),
    ("ru", "Ruth"),
    ("1sa", "1 Samuel"),
    ("1 sam", "1 Samuel"),
    ("2sa", "2 Samuel"),
    ("2 sam", "2 Samuel"),
    ("1ki", "1 Kings"),
    ("1 kgs", "1 Kings"),
    ("2ki", "2 Kings"),
    ("2 kgs", "2 Kings"),
    ("1ch", "1 Chronicles"),
    ("1 chr", "1 Chronicles"),
    ("2ch", "2 Chronicles"),
    ("2 chr", "2 Chronicles"),
    ("ezr", "Ezra"),
    ("neh", "Nehemiah"),
    ("est", "Esther"),
    ("ps", "Psalms"),
    ("psa", "Psalms"),
    ("psalm", "Psalms"),
    ("pr", "Proverbs"),
    ("prov", "Proverbs"),
    ("eccl", "Ecclesiastes"),
    ("ecc", "Ecclesiastes"),
    ("song", "Song of Solomon"),
    ("sos", "Song of Solomon"),
    ("song of songs", "Song of Solomon"),
    ("isa", "Isaiah"),
    ("jer", "Jeremiah"),
    ("lam", "Lamentations"),
    ("ezek", "Ezekiel"),
    ("dan", "Daniel"),
    ("hos", "Hosea"),
    ("joe", "Joel"),
    ("amo", "Amos"),
    ("oba", "Obadiah"),
    ("jon", "Jonah"),
    ("mic", "Micah"),
    ("nah", "Nahum"),
    ("hab", "Habakkuk"),
    ("zep", "Zephaniah"),
    ("hag", "Haggai"),
    ("zec", "Zechariah"),
    ("mal", "Malachi"),
    ("mt", "Matthew"),
    ("matt", "Matthew"),
    ("mk", "Mark"),
    ("lk", "Luke"),
    ("jn", "John"),
    ("ac", "Acts"),
    ("rom", "Romans"),
    ("1co", "1 Corinthians"),
    ("1 cor", "1 Corinthians"),
    ("2co", "2 Corinthians"),
    ("2 cor", "2 Corinthians"),
    ("gal", "Galatians"),
    ("eph", "Ephesians"),
    ("php", "Philippians"),
    ("phil", "Philippians"),
    ("col", "Colossians"),
    ("1th", "1 Thessalonians"),
    ("1 thess", "1 Thessalonians"),
    ("2th", "2 Thessalonians"),
    ("2 thess", "2 Thessalonians"),
    ("1ti", "1 Timothy"),
    ("1 tim", "1 Timothy"),
    ("2ti", "2 Timothy"),
    ("2 tim", "2 Timothy"),
    ("tit", "Titus"),
    ("phm", "Philemon"),
    ("heb", "Hebrews"),
    ("jas", "James"),
    ("1pe", "1 Peter"),
    ("1 pet", "1 Peter"),
    ("2pe", "2 Peter"),
    ("2 pet", "2 Peter"),
    ("1jn", "1 John"),
    ("2jn", "2 John"),
    ("3jn", "3 John"),
    ("jud", "Jude"),
    ("rev", "Revelation"),
    ("re", "Revelation"),
    ("revelations", "Revelation"),
    ("apocalypse", "Revelation"),
];

/// Leading ordinals rewritten to arabic numerals before lookup.
const ORDINAL_PREFIXES: &[(&str, &str)] = &[
    ("first ", "1 "),
    ("second ", "2 "),
    ("third ", "3 "),
    ("1st ", "1 "),
    ("2nd ", "2 "),
    ("3rd ", "3 "),
    ("iii ", "3 "),
    ("ii ", "2 "),
    ("i ", "1 "),
];

/// A book of the canonical list.
///
/// Ordering follows the canonical list, so sorting books (or locators) yields
/// corpus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Book(u8);

impl Book {
    /// Look up a book by its exact canonical spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        CANONICAL_BOOKS
            .iter()
            .position(|b| *b == name)
            .and_then(|i| u8::try_from(i).ok())
            .map(Self)
    }

    /// Resolve loose user input ("gen", "1 kgs", "First John", "SONG OF SONGS")
    /// to a canonical book.
    #[must_use]
    pub fn resolve(input: &str) -> Option<Self> {
        let normalized = normalize(input);
        if normalized.is_empty() {
            return None;
        }

        if let Some(book) = lookup_normalized(&normalized) {
            return Some(book);
        }

        // "1samuel" / "2kgs"
        let mut chars = normalized.chars();
        if let Some(first @ '1'..='3') = chars.next() {
            let rest = chars.as_str();
            if rest.starts_with(|c: char| c.is_alphabetic()) {
                return lookup_normalized(&format!("{first} {rest}"));
            }
        }

        None
    }

    /// The canonical spelling, e.g. `"1 Samuel"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        CANONICAL_BOOKS[usize::from(self.0)]
    }

    /// Zero-based position in the canonical list.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Iterate over all 66 books in canonical order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..66u8).map(Self)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize(input: &str) -> String {
    let mut s = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    for (prefix, numeral) in ORDINAL_PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = format!("{numeral}{rest}");
            break;
        }
    }

    s
}

fn lookup_normalized(normalized: &str) -> Option<Book> {
    if let Some((_, name)) = ALIASES.iter().find(|(alias, _)| *alias == normalized) {
        return Book::from_name(name);
    }

    CANONICAL_BOOKS
        .iter()
        .position(|b| b.to_lowercase() == normalized)
        .and_then(|i| u8::try_from(i).ok())
        .map(Book)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for book in Book::all() {
            assert_eq!(Book::from_name(book.name()), Some(book));
        }
        assert_eq!(Book::all().count(), 66);
    }

    #[test]
    fn from_name_is_exact() {
        assert!(Book::from_name("genesis").is_none());
        assert!(Book::from_name("1 samuel").is_none());
        assert!(Book::from_name("1Samuel").is_none());
        assert_eq!(Book::from_name("1 Samuel").map(Book::name), Some("1 Samuel"));
    }

    #[test]
    fn canonical_order() {
        let genesis = Book::from_name("Genesis");
        let revelation = Book::from_name("Revelation");
        assert!(genesis < revelation);
        assert_eq!(genesis.map(Book::index), Some(0));
        assert_eq!(revelation.map(Book::index), Some(65));
    }

    mod resolve_tests {
        use super::*;

        fn resolved(input: &str) -> Option<&'static str> {
            Book::resolve(input).map(Book::name)
        }

        #[test]
        fn aliases() {
            assert_eq!(resolved("gen"), Some("Genesis"));
            assert_eq!(resolved("Rev"), Some("Revelation"));
            assert_eq!(resolved("song of songs"), Some("Song of Solomon"));
            assert_eq!(resolved("1 kgs"), Some("1 Kings"));
        }

        #[test]
        fn case_and_whitespace() {
            assert_eq!(resolved("  JOHN "), Some("John"));
            assert_eq!(resolved("song   of  solomon"), Some("Song of Solomon"));
        }

        #[test]
        fn ordinals() {
            assert_eq!(resolved("First John"), Some("1 John"));
            assert_eq!(resolved("2nd Timothy"), Some("2 Timothy"));
            assert_eq!(resolved("iii john"), Some("3 John"));
            assert_eq!(resolved("ii kings"), Some("2 Kings"));
        }

        #[test]
        fn compact_numbered_names() {
            assert_eq!(resolved("1samuel"), Some("1 Samuel"));
            assert_eq!(resolved("2cor"), Some("2 Corinthians"));
        }

        #[test]
        fn unknown_input() {
            assert_eq!(resolved(""), None);
            assert_eq!(resolved("Hezekiah"), None);
            assert_eq!(resolved("4 John"), None);
        }
    }
}
