//! Markdown summary generation
//!
//! This module generates human-readable markdown reports of a crawl run,
//! including run metadata, statistics, and the list of visited pages.

use crate::crawler::CrawlResult;
use crate::output::stats::CrawlStatistics;
use crate::CrawlError;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Metadata describing one crawl run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seeds: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// SHA-256 of the configuration file, when one was loaded
    pub config_hash: Option<String>,

    pub statistics: CrawlStatistics,
}

impl RunSummary {
    pub fn new(
        seeds: Vec<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        results: &[CrawlResult],
    ) -> Self {
        Self {
            seeds,
            started_at,
            finished_at,
            config_hash: None,
            statistics: CrawlStatistics::from_results(results),
        }
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Writes a markdown summary to `output_path`
///
/// # Arguments
///
/// * `summary` - Run metadata and statistics
/// * `results` - The results of the run, in discovery order
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(CrawlError::Io)` - Failed to write summary
pub fn write_markdown_summary(
    summary: &RunSummary,
    results: &[CrawlResult],
    output_path: &Path,
) -> Result<(), CrawlError> {
    let markdown = format_markdown_summary(summary, results);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl run as markdown
pub fn format_markdown_summary(summary: &RunSummary, results: &[CrawlResult]) -> String {
    let stats = &summary.statistics;
    let mut md = String::new();

    md.push_str("# Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Duration**: {} seconds\n", summary.duration_seconds()));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push_str("- **Seeds**:\n");
    for seed in &summary.seeds {
        md.push_str(&format!("  - {}\n", seed));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Recorded**: {}\n", stats.total_results));
    md.push_str(&format!("- **Unique Origins**: {}\n", stats.unique_origins));
    md.push_str(&format!("- **Total Links**: {}\n", stats.total_links));
    md.push_str(&format!("- **Fetched but Not Parsed**: {}\n", stats.unparsed));
    md.push_str(&format!("- **HTTP Errors**: {}\n", stats.http_errors));
    md.push_str(&format!("- **Disallowed by robots.txt**: {}\n", stats.robots_denied));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n\n", stats.success_rate()));

    if !stats.results_by_depth.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &stats.results_by_depth {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    if !results.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| # | URL | Depth | Status | Title |\n");
        md.push_str("|---|-----|-------|--------|-------|\n");
        for (i, result) in results.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                i + 1,
                result.url,
                result.depth,
                result.status_code,
                escape_cell(&result.title)
            ));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
