//! Per-page crawl records

use crate::crawler::fetcher::ROBOTS_DENIED_STATUS;
use crate::crawler::frontier::FrontierEntry;
use crate::crawler::parser::ParsedPage;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum length of a page snippet, including the trailing `...`
pub const SNIPPET_MAX_CHARS: usize = 300;

/// Maximum length of a parse error message kept as a snippet
pub const PARSE_ERROR_MAX_CHARS: usize = 200;

/// Snippet recorded for URLs refused by robots.txt
pub const ROBOTS_DENIED_SNIPPET: &str = "[Disallowed by robots.txt]";

/// One record per attempted page, in discovery order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    /// Normalized URL of the page
    pub url: String,

    /// Link distance from the seeds
    pub depth: u32,

    /// HTTP status, or 0 when robots.txt denied the fetch
    pub status_code: u16,

    pub title: String,
    pub description: String,
    pub snippet: String,

    /// Number of distinct links extracted from the page
    pub links_found: usize,

    pub fetched_at: DateTime<Utc>,

    /// Whether an HTML body was parsed for this page
    #[serde(skip)]
    pub parsed: bool,
}

impl CrawlResult {
    fn bare(entry: &FrontierEntry, status_code: u16, snippet: String) -> Self {
        Self {
            url: entry.url.to_string(),
            depth: entry.depth,
            status_code,
            title: String::new(),
            description: String::new(),
            snippet,
            links_found: 0,
            fetched_at: Utc::now(),
            parsed: false,
        }
    }

    /// Record for a page robots.txt did not allow us to fetch
    pub fn robots_denied(entry: &FrontierEntry) -> Self {
        Self::bare(entry, ROBOTS_DENIED_STATUS, ROBOTS_DENIED_SNIPPET.to_string())
    }

    /// Record for a non-200 or empty response: `[HTTP <code>]`
    pub fn status_only(entry: &FrontierEntry, status_code: u16) -> Self {
        Self::bare(entry, status_code, format!("[HTTP {}]", status_code))
    }

    /// Record for a page whose HTML could not be processed
    pub fn parse_failed(entry: &FrontierEntry, status_code: u16, error: &str) -> Self {
        let message: String = error.chars().take(PARSE_ERROR_MAX_CHARS).collect();
        Self::bare(entry, status_code, message)
    }

    /// Record for a successfully parsed page
    ///
    /// The snippet comes from the description, or from the page text when the
    /// page has no description.
    pub fn from_page(entry: &FrontierEntry, status_code: u16, page: &ParsedPage) -> Self {
        let source = if page.description.is_empty() {
            &page.text
        } else {
            &page.description
        };

        Self {
            title: page.title.clone(),
            description: page.description.clone(),
            snippet: make_snippet(source, SNIPPET_MAX_CHARS),
            links_found: page.links.len(),
            parsed: true,
            ..Self::bare(entry, status_code, String::new())
        }
    }

    pub fn is_robots_denied(&self) -> bool {
        self.status_code == ROBOTS_DENIED_STATUS
    }

    /// True for a 200 response whose HTML was parsed
    pub fn is_success(&self) -> bool {
        self.status_code == 200 && self.parsed
    }
}

/// Shortens `text` to at most `max_chars` characters
///
/// Longer text is cut on a word boundary and marked with `...`.
///
/// # Example
///
/// ```
/// use crawlbot::crawler::make_snippet;
///
/// assert_eq!(make_snippet("short", 300), "short");
/// assert_eq!(make_snippet("one two three four", 12), "one two...");
/// ```
pub fn make_snippet(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    let head = match cut.rsplit_once(char::is_whitespace) {
        Some((head, _)) if !head.trim_end().is_empty() => head.trim_end(),
        _ => cut.as_str(),
    };

    format!("{}...", head)
}
