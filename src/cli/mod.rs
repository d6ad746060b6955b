//! CLI interface for verseq.
//!
//! Provides command-line argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line interface for verseq.
#[derive(Parser)]
#[command(name = "verseq")]
#[command(author, version, about = "Search and read a verse corpus", long_about = None)]
pub struct Cli {
    /// Corpus JSON file (overrides the config file).
    #[arg(long, global = true, value_name = "FILE")]
    pub corpus: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search the corpus. Run `verseq guide` for the query syntax.
    Search {
        /// The search query, e.g. `=love & joy | "living water":c`.
        query: String,

        /// Maximum number of results to print (default from config).
        #[arg(short, long)]
        limit: Option<usize>,

        /// Restrict the search to one book (abbreviations allowed).
        #[arg(short, long)]
        book: Option<String>,

        /// Print plain `<reference>: <text>` lines for use as AI context.
        #[arg(long, conflicts_with = "json")]
        context: bool,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the books present in the corpus.
    Books,

    /// List the chapters of a book.
    Chapters {
        /// Book name or abbreviation (e.g. "Genesis", "1 kgs").
        book: String,
    },

    /// Print one chapter.
    Read {
        /// Book name or abbreviation.
        book: String,

        /// Chapter number.
        chapter: u32,
    },

    /// Show the search cheat-sheet.
    Guide,

    /// Start the MCP server for AI editor integration.
    #[cfg(feature = "mcp")]
    Serve,
}
