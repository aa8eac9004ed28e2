//! Plain-text listing of crawl results

use crate::crawler::CrawlResult;

/// Number of results listed before the remainder is summarized
pub const DEFAULT_MAX_SNIPPETS: usize = 20;

/// Snippets longer than this are cut in the listing
const LISTING_SNIPPET_CHARS: usize = 400;

/// Formats results as a short numbered listing
///
/// # Example output
///
/// ```text
/// Crawled 2 page(s).
///
/// [1] https://example.com/ (depth=0, status=200)
///   Title: Example
///   Snippet: An example page
///
/// [2] https://example.com/missing (depth=1, status=404)
///   Snippet: [HTTP 404]
/// ```
pub fn format_results(results: &[CrawlResult], max_snippets: usize) -> String {
    let mut lines = vec![format!("Crawled {} page(s).", results.len())];

    for (i, result) in results.iter().take(max_snippets).enumerate() {
        lines.push(format!(
            "\n[{}] {} (depth={}, status={})",
            i + 1,
            result.url,
            result.depth,
            result.status_code
        ));
        if !result.title.is_empty() {
            lines.push(format!("  Title: {}", result.title));
        }
        if !result.snippet.is_empty() {
            let snippet: String = result.snippet.chars().take(LISTING_SNIPPET_CHARS).collect();
            lines.push(format!("  Snippet: {}", snippet));
        }
    }

    if results.len() > max_snippets {
        lines.push(format!("\n... and {} more.", results.len() - max_snippets));
    }

    lines.join("\n")
}
