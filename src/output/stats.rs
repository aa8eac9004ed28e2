//! Statistics over a crawl result list
//!
//! This module provides functionality for aggregating and displaying
//! per-run crawl statistics.

use crate::crawler::CrawlResult;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStatistics {
    /// Total number of results recorded
    pub total_results: usize,

    /// Results with HTTP 200 and a parsed page
    pub successful: usize,

    /// Results refused by robots.txt
    pub robots_denied: usize,

    /// Results with a non-200 HTTP status
    pub http_errors: usize,

    /// HTTP 200 results with nothing parsed (non-HTML, empty, or unparseable)
    pub unparsed: usize,

    /// Sum of links found across all pages
    pub total_links: usize,

    /// Distinct origins among the results
    pub unique_origins: usize,

    /// Count of results per depth
    pub results_by_depth: BTreeMap<u32, usize>,

    /// Count of results per status code
    pub results_by_status: BTreeMap<u16, usize>,
}

impl CrawlStatistics {
    /// Aggregates statistics from a result list
    pub fn from_results(results: &[CrawlResult]) -> Self {
        let mut stats = Self {
            total_results: results.len(),
            ..Self::default()
        };
        let mut origins = BTreeSet::new();

        for result in results {
            if result.is_robots_denied() {
                stats.robots_denied += 1;
            } else if result.is_success() {
                stats.successful += 1;
            } else if result.status_code == 200 {
                stats.unparsed += 1;
            } else {
                stats.http_errors += 1;
            }

            stats.total_links += result.links_found;
            *stats.results_by_depth.entry(result.depth).or_insert(0) += 1;
            *stats.results_by_status.entry(result.status_code).or_insert(0) += 1;

            if let Ok(url) = Url::parse(&result.url) {
                origins.insert(crate::url::origin_of(&url));
            }
        }

        stats.unique_origins = origins.len();
        stats
    }

    /// Percentage of results that were fetched and parsed
    pub fn success_rate(&self) -> f64 {
        if self.total_results == 0 {
            0.0
        } else {
            (self.successful as f64 / self.total_results as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages recorded: {}", stats.total_results);
    println!("  Unique origins: {}", stats.unique_origins);
    println!("  Total links found: {}", stats.total_links);
    println!();

    println!("Outcomes:");
    println!("  Successful: {}", stats.successful);
    println!("  Fetched but not parsed: {}", stats.unparsed);
    println!("  HTTP errors: {}", stats.http_errors);
    println!("  Disallowed by robots.txt: {}", stats.robots_denied);
    println!();

    if !stats.results_by_depth.is_empty() {
        println!("Pages by Depth:");
        for (depth, count) in &stats.results_by_depth {
            println!("  {}: {}", depth, count);
        }
        println!();
    }

    if !stats.results_by_status.is_empty() {
        println!("Pages by Status:");
        // Sort statuses by count (descending)
        let mut status_counts: Vec<_> = stats.results_by_status.iter().collect();
        status_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

        for (status, count) in status_counts {
            println!("  {}: {}", status, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully fetched)",
        stats.success_rate(),
        stats.successful,
        stats.total_results
    );
}
