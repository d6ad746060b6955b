//! Second pass: build the typed query tree from lexer tokens.

use regex::RegexBuilder;
use tracing::debug;

use super::lexer::{Lexed, Token, lex};
use super::{CaseMode, Leaf, Query, QueryError, QueryNode};

/// Case flags recognized at the very end of a query.
const CASE_FLAGS: [(&str, CaseMode); 2] = [
    (":c", CaseMode::CaseSensitive),
    (":i", CaseMode::CaseInsensitive),
];

/// Compile a raw query string.
///
/// `|` separates AND-groups, `&` separates leaves within a group. Leaves are
/// `/regex/`, `"phrase"`, `=word`, or plain substring text. A trailing `:c`
/// or `:i` (outside any phrase or regex) sets the case mode.
///
/// # Errors
///
/// Returns `QueryError::EmptyTerm` if any leaf is empty (including an empty
/// query or a dangling operator), or `QueryError::InvalidRegex` if a regex
/// leaf does not compile.
pub fn compile(raw: &str) -> Result<Query, QueryError> {
    let (case_mode, lexed) = split_case_flag(raw.trim());

    let mut groups: Vec<Vec<QueryNode>> = vec![Vec::new()];
    for token in lexed.tokens {
        match token {
            Token::Term(text) => {
                let leaf = classify(text, case_mode).map_err(|e| match e {
                    QueryError::EmptyTerm(_) => QueryError::EmptyTerm(raw.to_string()),
                    other => other,
                })?;
                if let Some(group) = groups.last_mut() {
                    group.push(QueryNode::Leaf(leaf));
                }
            }
            Token::And => {}
            Token::Or => groups.push(Vec::new()),
        }
    }

    let mut alternatives: Vec<QueryNode> = groups.into_iter().map(collapse_and).collect();
    let root = if alternatives.len() == 1 {
        alternatives.remove(0)
    } else {
        QueryNode::Or(alternatives)
    };

    let query = Query::new(root, case_mode);
    debug!(raw, compiled = %query, label = query.label(), "compiled query");
    Ok(query)
}

fn collapse_and(mut leaves: Vec<QueryNode>) -> QueryNode {
    if leaves.len() == 1 {
        leaves.remove(0)
    } else {
        QueryNode::And(leaves)
    }
}

/// Strip a trailing case flag unless it sits inside an unterminated phrase or
/// regex, and lex what remains.
fn split_case_flag(query: &str) -> (CaseMode, Lexed<'_>) {
    for (suffix, mode) in CASE_FLAGS {
        if let Some(body) = query.strip_suffix(suffix) {
            let lexed = lex(body);
            if !lexed.unterminated {
                return (mode, lexed);
            }
        }
    }

    (CaseMode::Default, lex(query))
}

/// Classify one term by its delimiters: regex, then phrase, then whole word,
/// then substring.
fn classify(text: &str, case_mode: CaseMode) -> Result<Leaf, QueryError> {
    let term = text.trim();
    let empty = || QueryError::EmptyTerm(text.to_string());

    if let Some(pattern) = delimited(term, '/') {
        if pattern.is_empty() {
            return Err(empty());
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_mode.folds())
            .build()
            .map_err(|source| QueryError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })?;
        return Ok(Leaf::Regex(regex));
    }

    if let Some(phrase) = delimited(term, '"') {
        if phrase.trim().is_empty() {
            return Err(empty());
        }
        return Ok(Leaf::Phrase(collapse_whitespace(phrase)));
    }

    if let Some(word) = term.strip_prefix('=') {
        let word = word.trim();
        if word.is_empty() {
            return Err(empty());
        }
        return Ok(Leaf::WholeWord(word.to_string()));
    }

    if term.is_empty() {
        return Err(empty());
    }
    Ok(Leaf::Substring(term.to_string()))
}

/// Inner text of `term` if it starts and ends with `delim` (at least two chars).
fn delimited(term: &str, delim: char) -> Option<&str> {
    term.strip_prefix(delim)?.strip_suffix(delim)
}

/// Replace every run of whitespace with a single space.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }

    out
}
