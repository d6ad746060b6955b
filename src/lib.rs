//! verseq - A verse corpus query engine.
//!
//! This library loads a corpus of short text records keyed by
//! `"Book Chapter:Verse"` and evaluates queries in a small search language
//! (substring, whole-word, phrase, regex, AND/OR, case flags) against it.
//! Hits come back in canonical corpus order.
//!
//! # Modules
//!
//! - [`reference`] - Verse references and the canonical book list
//! - [`corpus`] - In-memory corpus with book/chapter navigation
//! - [`query`] - Query language lexer, parser and tree
//! - [`search`] - Query evaluation over a corpus
//! - [`commands`] - High-level operations (search, chapters, read)
//! - [`config`] - Configuration loading
//! - [`cli`] - Command-line interface definitions
//!
//! ```
//! use verseq::corpus::Corpus;
//! use verseq::{query, search};
//!
//! let corpus = Corpus::from_entries([
//!     ("John 4:10", "he would have given thee living water."),
//!     ("John 4:11", "from whence then hast thou that living water?"),
//! ])?;
//! let query = query::compile("\"living water\" & =thou")?;
//! let hits = search::evaluate(&query, &corpus);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].locator.to_string(), "John 4:11");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod query;
pub mod reference;
pub mod search;

#[cfg(feature = "mcp")]
pub mod mcp;
