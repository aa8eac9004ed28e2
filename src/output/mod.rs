//! Output module for presenting crawl results
//!
//! This module handles:
//! - A plain-text listing of visited pages
//! - JSON export of the result list
//! - Aggregated crawl statistics
//! - Markdown run reports

mod markdown;
pub mod stats;
mod text;

pub use markdown::{format_markdown_summary, write_markdown_summary, RunSummary};
pub use stats::{print_statistics, CrawlStatistics};
pub use text::{format_results, DEFAULT_MAX_SNIPPETS};

use crate::crawler::CrawlResult;

/// Serializes results as a pretty-printed JSON array
pub fn results_to_json(results: &[CrawlResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_results_to_json() {
        let results = vec![CrawlResult {
            url: "https://example.com/".to_string(),
            depth: 0,
            status_code: 200,
            title: "Home".to_string(),
            description: String::new(),
            snippet: "Welcome".to_string(),
            links_found: 4,
            fetched_at: Utc::now(),
            parsed: true,
        }];

        let json = results_to_json(&results).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["title"], "Home");
        assert_eq!(parsed[0]["links_found"], 4);
        assert!(parsed[0].get("parsed").is_none());
    }

    #[test]
    fn test_empty_results_to_json() {
        assert_eq!(results_to_json(&[]).unwrap(), "[]");
    }
}
