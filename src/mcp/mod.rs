//! MCP server implementation for verseq.
//!
//! Exposes search and chapter reading as MCP tools for AI editors. The corpus
//! is loaded once at startup and shared read-only by every tool call.

use std::borrow::Cow;
use std::fmt::Write;
use std::sync::Arc;

use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorCode, ErrorData as McpError, ServerCapabilities, ServerInfo,
    },
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
};
use serde::Deserialize;

use crate::commands;
use crate::config::DEFAULT_SEARCH_LIMIT;
use crate::corpus::Corpus;
use crate::query::QueryError;
use crate::search::format_context;

/// Parameters for `search_verses` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "Query, e.g. '=love & joy', '\"living water\"', '/grace.*faith/'; append ':c' for case-sensitive")]
    pub query: String,
    #[schemars(description = "Maximum number of results (default: 50)")]
    pub limit: Option<usize>,
    #[schemars(description = "Restrict the search to one book")]
    pub book: Option<String>,
}

/// Parameters for `read_chapter` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReadParams {
    #[schemars(description = "Book name or abbreviation (e.g. 'Genesis', '1 kgs')")]
    pub book: String,
    #[schemars(description = "Chapter number")]
    pub chapter: u32,
}

fn internal_error(context: &str, e: &anyhow::Error) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(format!("{context}: {e}")),
        data: None,
    }
}

/// Map a failed search to an MCP error. A rejected query is `INVALID_PARAMS`.
fn search_error(e: &anyhow::Error) -> McpError {
    if e.downcast_ref::<QueryError>().is_some() {
        McpError {
            code: ErrorCode::INVALID_PARAMS,
            message: Cow::from(format!("Invalid query: {e}")),
            data: None,
        }
    } else {
        internal_error("Search failed", e)
    }
}

/// MCP server exposing verseq tools.
#[derive(Clone)]
pub struct VerseqServer {
    corpus: Arc<Corpus>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl VerseqServer {
    #[must_use]
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus: Arc::new(corpus),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Search verses with the verseq query language (see search_guide)")]
    async fn search_verses(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

        match commands::search(&self.corpus, &params.query, Some(limit), params.book.as_deref()) {
            Ok(report) => {
                if report.hits.is_empty() {
                    return Ok(CallToolResult::success(vec![Content::text(format!(
                        "No matches found for '{}'",
                        params.query
                    ))]));
                }

                let output = format!("{}\n\n{}", report.header(), format_context(&report.hits));
                Ok(CallToolResult::success(vec![Content::text(output)]))
            }
            Err(e) => Err(search_error(&e)),
        }
    }

    #[tool(description = "List the books present in the corpus")]
    async fn list_books(&self) -> Result<CallToolResult, McpError> {
        let books = self.corpus.list_books();
        if books.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No books found.".to_string(),
            )]));
        }

        let mut output = String::new();
        for book in &books {
            let chapters = self.corpus.list_chapters(*book).map_or(0, |c| c.len());
            let _ = writeln!(output, "- **{book}** ({chapters} chapters)");
        }

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(description = "Read the full text of one chapter")]
    async fn read_chapter(
        &self,
        Parameters(params): Parameters<ReadParams>,
    ) -> Result<CallToolResult, McpError> {
        match commands::read(&self.corpus, &params.book, params.chapter) {
            Ok(view) => Ok(CallToolResult::success(vec![Content::text(view.context())])),
            Err(e) => Err(internal_error("Failed to read chapter", &e)),
        }
    }

    #[tool(description = "Show the search query syntax cheat-sheet")]
    async fn search_guide(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            commands::SEARCH_GUIDE.to_string(),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for VerseqServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "verseq provides searchable access to a verse corpus. \
                Use search_verses to find verses, list_books and read_chapter to browse, \
                and search_guide for the query syntax."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Start the MCP server with stdio transport.
///
/// # Errors
///
/// Returns an error if the server fails to start or encounters a fatal error.
pub async fn serve(corpus: Corpus) -> anyhow::Result<()> {
    tracing::info!(verses = corpus.len(), "starting MCP server");
    let server = VerseqServer::new(corpus);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
