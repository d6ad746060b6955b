//! Query language: lexing, parsing and the compiled query tree.
//!
//! ```text
//! query    := andgroup ('|' andgroup)*   [':c' | ':i']
//! andgroup := leaf ('&' leaf)*
//! leaf     := '/' regex '/' | '"' phrase '"' | '=' word | text
//! ```

mod lexer;
mod parser;

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use thiserror::Error;

pub use parser::compile;
pub(crate) use parser::collapse_whitespace;

/// Errors produced while compiling a query. The caller may fix the query and
/// try again; no corpus state is involved.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid regex /{pattern}/: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Empty search term in query '{0}'")]
    EmptyTerm(String),
}

/// Case-sensitivity policy for a whole query, taken from the trailing flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// No flag: case-insensitive.
    #[default]
    Default,
    /// `:c`
    CaseSensitive,
    /// `:i`
    CaseInsensitive,
}

impl CaseMode {
    /// Whether text and terms are lowercased before comparison.
    #[must_use]
    pub fn folds(self) -> bool {
        !matches!(self, Self::CaseSensitive)
    }

    #[must_use]
    pub fn describe(self) -> &'static str {
        if self.folds() {
            "case-insensitive"
        } else {
            "case-sensitive"
        }
    }
}

/// A single non-boolean matcher.
#[derive(Debug, Clone)]
pub enum Leaf {
    /// Plain text anywhere in the verse.
    Substring(String),
    /// Text bounded by non-word characters or the ends of the verse.
    WholeWord(String),
    /// Contiguous text, compared with whitespace runs collapsed.
    Phrase(String),
    /// Regex compiled with the query's case mode.
    Regex(Regex),
}

impl Leaf {
    /// Short name of the leaf kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Substring(_) => "substring",
            Self::WholeWord(_) => "whole-word",
            Self::Phrase(_) => "phrase",
            Self::Regex(_) => "regex",
        }
    }
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Substring(a), Self::Substring(b))
            | (Self::WholeWord(a), Self::WholeWord(b))
            | (Self::Phrase(a), Self::Phrase(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring(term) => f.write_str(term),
            Self::WholeWord(term) => write!(f, "={term}"),
            Self::Phrase(phrase) => write!(f, "\"{phrase}\""),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Query tree node. The parser only produces `Or` of `And` of leaves, with
/// single-child groups collapsed.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Leaf(Leaf),
    /// All children must match.
    And(Vec<QueryNode>),
    /// Any child may match.
    Or(Vec<QueryNode>),
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (children, sep) = match self {
            Self::Leaf(leaf) => return leaf.fmt(f),
            Self::And(children) => (children, " & "),
            Self::Or(children) => (children, " | "),
        };

        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            child.fmt(f)?;
        }
        Ok(())
    }
}

/// A compiled query: the tree plus its resolved case mode.
#[derive(Debug, Clone)]
pub struct Query {
    root: QueryNode,
    case_mode: CaseMode,
}

impl Query {
    #[must_use]
    pub fn new(root: QueryNode, case_mode: CaseMode) -> Self {
        Self { root, case_mode }
    }

    #[must_use]
    pub fn root(&self) -> &QueryNode {
        &self.root
    }

    #[must_use]
    pub fn case_mode(&self) -> CaseMode {
        self.case_mode
    }

    /// Human-readable query form, used in result headers.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match &self.root {
            QueryNode::Leaf(leaf) => leaf.kind(),
            QueryNode::And(_) => "AND",
            QueryNode::Or(children) => {
                if children.iter().any(|c| matches!(c, QueryNode::And(_))) {
                    "AND/OR"
                } else {
                    "OR"
                }
            }
        }
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)?;
        match self.case_mode {
            CaseMode::Default => Ok(()),
            CaseMode::CaseSensitive => f.write_str(":c"),
            CaseMode::CaseInsensitive => f.write_str(":i"),
        }
    }
}
