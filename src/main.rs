use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use verseq::cli::{Cli, Commands};
use verseq::commands;
use verseq::config::Config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "verseq=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let corpus_path = cli.corpus.as_deref();
    let config = match cli.command {
        Some(Commands::Guide) | None => Config::default(),
        Some(_) => Config::load()?,
    };

    match cli.command {
        Some(Commands::Search {
            query,
            limit,
            book,
            context,
            json,
        }) => {
            let limit = limit.unwrap_or(config.search.limit);
            let corpus = commands::load_corpus(corpus_path, &config)?;
            let report = commands::search(&corpus, &query, Some(limit), book.as_deref())?;

            let mut out = io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &report.hits)?;
                writeln!(out)?;
            } else if context {
                write!(out, "{}", verseq::search::format_context(&report.hits))?;
            } else if report.hits.is_empty() {
                writeln!(out, "No matches found for '{query}'")?;
            } else {
                writeln!(out, "{}", report.header())?;
                for (i, hit) in report.hits.iter().enumerate() {
                    writeln!(out, "{}. {}: {}", i + 1, hit.locator, hit.text)?;
                }
            }
            Ok(())
        }
        Some(Commands::Books) => {
            let corpus = commands::load_corpus(corpus_path, &config)?;
            let books = corpus.list_books();

            let mut out = io::stdout().lock();
            if books.is_empty() {
                writeln!(out, "No books found")?;
            }
            for (i, book) in books.iter().enumerate() {
                writeln!(out, "{}. {book}", i + 1)?;
            }
            Ok(())
        }
        Some(Commands::Chapters { book }) => {
            let corpus = commands::load_corpus(corpus_path, &config)?;
            let (book, chapters) = commands::chapters(&corpus, &book)?;
            let chapters: Vec<String> = chapters.iter().map(ToString::to_string).collect();
            println!("Chapters in {book}: {}", chapters.join(" "));
            Ok(())
        }
        Some(Commands::Read { book, chapter }) => {
            let corpus = commands::load_corpus(corpus_path, &config)?;
            let view = commands::read(&corpus, &book, chapter)?;

            let mut out = io::stdout().lock();
            write!(out, "{}", view.context())?;

            let mut nav = Vec::new();
            if let Some(prev) = view.prev {
                nav.push(format!("Previous: {} {prev}", view.book));
            }
            if let Some(next) = view.next {
                nav.push(format!("Next: {} {next}", view.book));
            }
            if !nav.is_empty() {
                writeln!(out, "\n{}", nav.join(" | "))?;
            }
            Ok(())
        }
        Some(Commands::Guide) => {
            print!("{}", commands::SEARCH_GUIDE);
            Ok(())
        }
        #[cfg(feature = "mcp")]
        Some(Commands::Serve) => {
            let corpus = commands::load_corpus(corpus_path, &config)?;
            tokio::runtime::Runtime::new()?.block_on(verseq::mcp::serve(corpus))
        }
        None => {
            Cli::parse_from(["verseq", "--help"]);
            Ok(())
        }
    }
}
