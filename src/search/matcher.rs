//! Per-verse predicate evaluation for a compiled query.

use std::borrow::Cow;
use std::cell::OnceCell;

use regex::Regex;

use crate::query::{Leaf, Query, QueryNode, collapse_whitespace};

/// A query prepared for scanning: literal terms are folded once according to
/// the query's case mode.
#[derive(Debug)]
pub struct Matcher<'q> {
    plan: Plan<'q>,
    fold: bool,
}

#[derive(Debug)]
enum Plan<'q> {
    Substring(String),
    WholeWord(String),
    Phrase(String),
    Regex(&'q Regex),
    All(Vec<Plan<'q>>),
    Any(Vec<Plan<'q>>),
}

impl<'q> Matcher<'q> {
    #[must_use]
    pub fn new(query: &'q Query) -> Self {
        let fold = query.case_mode().folds();
        Self {
            plan: Plan::build(query.root(), fold),
            fold,
        }
    }

    /// Whether `text` satisfies the query.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let haystack = Haystack::new(text, self.fold);
        self.plan.eval(&haystack)
    }
}

impl<'q> Plan<'q> {
    fn build(node: &'q QueryNode, fold: bool) -> Self {
        let prepare = |term: &str| {
            if fold {
                term.to_lowercase()
            } else {
                term.to_string()
            }
        };

        match node {
            QueryNode::Leaf(Leaf::Substring(term)) => Self::Substring(prepare(term)),
            QueryNode::Leaf(Leaf::WholeWord(word)) => Self::WholeWord(prepare(word)),
            QueryNode::Leaf(Leaf::Phrase(phrase)) => Self::Phrase(prepare(phrase)),
            QueryNode::Leaf(Leaf::Regex(re)) => Self::Regex(re),
            QueryNode::And(children) => {
                Self::All(children.iter().map(|c| Self::build(c, fold)).collect())
            }
            QueryNode::Or(children) => {
                Self::Any(children.iter().map(|c| Self::build(c, fold)).collect())
            }
        }
    }

    fn eval(&self, haystack: &Haystack<'_>) -> bool {
        match self {
            Self::Substring(term) => haystack.text().contains(term.as_str()),
            Self::WholeWord(word) => contains_word(haystack.text(), word),
            Self::Phrase(phrase) => haystack.collapsed().contains(phrase.as_str()),
            Self::Regex(re) => re.is_match(haystack.raw),
            Self::All(plans) => plans.iter().all(|p| p.eval(haystack)),
            Self::Any(plans) => plans.iter().any(|p| p.eval(haystack)),
        }
    }
}

/// One verse's text, with folded and whitespace-collapsed forms computed on
/// first use.
struct Haystack<'t> {
    raw: &'t str,
    fold: bool,
    folded: OnceCell<Cow<'t, str>>,
    collapsed: OnceCell<String>,
}

impl<'t> Haystack<'t> {
    fn new(raw: &'t str, fold: bool) -> Self {
        Self {
            raw,
            fold,
            folded: OnceCell::new(),
            collapsed: OnceCell::new(),
        }
    }

    fn text(&self) -> &str {
        self.folded.get_or_init(|| {
            if self.fold {
                Cow::Owned(self.raw.to_lowercase())
            } else {
                Cow::Borrowed(self.raw)
            }
        })
    }

    fn collapsed(&self) -> &str {
        self.collapsed.get_or_init(|| collapse_whitespace(self.text()))
    }
}

/// Letters, digits and underscore.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `word` occurs in `text` with no word character directly before or
/// after it. Overlapping occurrences are all considered.
fn contains_word(text: &str, word: &str) -> bool {
    let mut from = 0;

    while let Some(pos) = text[from..].find(word) {
        let start = from + pos;
        let end = start + word.len();

        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        if !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char) {
            return true;
        }

        from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        if from > text.len() {
            break;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::compile;

    fn matches(query: &str, text: &str) -> bool {
        let query = compile(query).unwrap();
        Matcher::new(&query).matches(text)
    }

    mod contains_word_tests {
        use super::*;

        #[test]
        fn bounded_by_punctuation_and_edges() {
            assert!(contains_word("love", "love"));
            assert!(contains_word("love, joy", "love"));
            assert!(contains_word("(love)", "love"));
            assert!(contains_word("joy love", "love"));
        }

        #[test]
        fn rejects_partial_words() {
            assert!(!contains_word("loved", "love"));
            assert!(!contains_word("beloved", "love"));
            assert!(!contains_word("love_joy", "love"));
        }

        #[test]
        fn digits_are_word_characters() {
            assert!(!contains_word("the 7th day", "7"));
            assert!(contains_word("the 7 days", "7"));
        }

        #[test]
        fn finds_later_occurrence_after_failed_one() {
            assert!(contains_word("beloved, love", "love"));
        }

        #[test]
        fn finds_overlapping_occurrence() {
            assert!(contains_word("xa a a", "a a"));
        }

        #[test]
        fn multibyte_text() {
            assert!(contains_word("é love é", "love"));
            assert!(!contains_word("élove", "love"));
        }
    }

    mod leaf_tests {
        use super::*;

        #[test]
        fn substring_default_folds_case() {
            assert!(matches("love", "God is LOVE"));
            assert!(matches("love", "Love suffereth long"));
            assert!(matches("LOVE", "beloved"));
        }

        #[test]
        fn substring_case_sensitive() {
            assert!(matches("love:c", "beloved"));
            assert!(!matches("love:c", "Love suffereth long"));
        }

        #[test]
        fn whole_word() {
            assert!(matches("=love", "God is love, and"));
            assert!(matches("=love", "Love never faileth"));
            assert!(!matches("=love", "he loved them"));
            assert!(!matches("=love", "my beloved son"));
            assert!(!matches("=Love:c", "God is love"));
        }

        #[test]
        fn phrase_ignores_whitespace_differences() {
            assert!(matches("\"living water\"", "given thee living water."));
            assert!(matches("\"living water\"", "given thee living  water."));
            assert!(matches("\"living   water\"", "given thee living\twater."));
            assert!(!matches("\"living water\"", "living and water"));
        }

        #[test]
        fn regex_searches_anywhere() {
            assert!(matches("/grace.*faith/", "by grace are ye saved through faith"));
            assert!(!matches("/grace.*faith/", "faith and grace"));
            assert!(matches("/^in the/", "In the beginning"));
            assert!(!matches("/^in the/:c", "In the beginning"));
        }

        #[test]
        fn regex_inline_flags_override_default() {
            assert!(!matches("/(?-i)lord/", "the LORD"));
            assert!(matches("/(?i)lord/:c", "the LORD"));
        }
    }

    mod boolean_tests {
        use super::*;

        #[test]
        fn and_requires_all() {
            assert!(matches("love & joy", "love, joy, peace"));
            assert!(!matches("love & joy", "love, peace"));
        }

        #[test]
        fn or_requires_any() {
            assert!(matches("mercy | grace", "full of grace"));
            assert!(matches("mercy | grace", "his mercy endureth"));
            assert!(!matches("mercy | grace", "truth"));
        }

        #[test]
        fn mixed_leaf_kinds() {
            assert!(matches("=God & \"the world\" | /zzz/", "For God so loved the world"));
            assert!(matches("nothing | /so\\s+loved/", "For God so loved the world"));
            assert!(!matches("=Go & world", "For God so loved the world"));
        }
    }
}
