//! Crawl request: seeds plus the budgets and origin policy for one run

use crate::config::{
    clamp_max_depth, clamp_max_pages, clamp_request_delay, clamp_timeout_seconds, CrawlerConfig,
};
use crate::url::canonical_origin;
use std::collections::HashSet;
use std::time::Duration;

/// Parameters of a single crawl run
///
/// Limits start from [`CrawlerConfig`] defaults. The `with_*` builders clamp
/// caller overrides into the configured bounds, so a request can never exceed
/// the hard ceilings.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    seeds: Vec<String>,
    max_pages: usize,
    max_depth: u32,
    timeout: Duration,
    request_delay: Duration,
    same_origin_only: bool,
    allowed_origins: Option<HashSet<String>>,
}

impl CrawlRequest {
    /// Creates a request with the built-in default limits
    pub fn new<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_config(seeds, &CrawlerConfig::default())
    }

    /// Creates a request whose limits come from `config`
    pub fn from_config<I, S>(seeds: I, config: &CrawlerConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seeds: seeds.into_iter().map(Into::into).collect(),
            max_pages: clamp_max_pages(config.max_pages),
            max_depth: clamp_max_depth(config.max_depth),
            timeout: Duration::from_secs(clamp_timeout_seconds(config.timeout_seconds)),
            request_delay: Duration::from_secs_f64(clamp_request_delay(config.request_delay)),
            same_origin_only: true,
            allowed_origins: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = clamp_max_pages(max_pages);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = clamp_max_depth(max_depth);
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(clamp_timeout_seconds(seconds));
        self
    }

    pub fn with_request_delay_seconds(mut self, seconds: f64) -> Self {
        self.request_delay = Duration::from_secs_f64(clamp_request_delay(seconds));
        self
    }

    /// Restricts the crawl to the origins of the seeds (the default)
    pub fn with_same_origin_only(mut self, same_origin_only: bool) -> Self {
        self.same_origin_only = same_origin_only;
        self
    }

    /// Sets the origins a cross-origin crawl may visit
    ///
    /// Only consulted when same-origin mode is off. An empty list allows all
    /// origins.
    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins: HashSet<String> = origins
            .into_iter()
            .map(|o| canonical_origin(o.as_ref()))
            .filter(|o| !o.is_empty())
            .collect();
        self.allowed_origins = Some(origins);
        self
    }

    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Wall-clock budget of the whole run
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn request_delay(&self) -> Duration {
        self.request_delay
    }

    pub fn same_origin_only(&self) -> bool {
        self.same_origin_only
    }

    pub fn allowed_origins(&self) -> Option<&HashSet<String>> {
        self.allowed_origins.as_ref()
    }
}

/// Splits a comma and/or whitespace separated seed string
///
/// # Example
///
/// ```
/// use crawlbot::crawler::parse_seed_list;
///
/// let seeds = parse_seed_list("https://a.test/, https://b.test/\nhttps://c.test/");
/// assert_eq!(seeds.len(), 3);
/// ```
pub fn parse_seed_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
