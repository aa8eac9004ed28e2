//! Crawl scheduler: the breadth-first run loop
//!
//! This module handles:
//! - Seeding the frontier from normalized seed URLs
//! - Enforcing the page, depth and wall-clock budgets
//! - Applying the origin policy to every dequeued and discovered URL
//! - Pacing requests with the configured delay
//! - Turning fetch and parse outcomes into [`CrawlResult`] records

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::parse_html;
use crate::crawler::request::CrawlRequest;
use crate::crawler::result::CrawlResult;
use crate::robots::RobotsCache;
use crate::url::{is_origin_allowed, normalize_url, origin_of};
use crate::{CrawlError, Result};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Upper bound on a single page request
pub const FETCH_TIMEOUT_CEILING: Duration = Duration::from_secs(15);

/// Lower bound on a single page request, however little budget remains
pub const MIN_FETCH_TIMEOUT: Duration = Duration::from_secs(1);

/// Timeout for one page request given the remaining run budget
///
/// A third of what is left, between [`MIN_FETCH_TIMEOUT`] and
/// [`FETCH_TIMEOUT_CEILING`], so a single slow page cannot consume the run.
pub fn fetch_timeout_for(remaining: Duration) -> Duration {
    (remaining / 3).clamp(MIN_FETCH_TIMEOUT, FETCH_TIMEOUT_CEILING)
}

/// Runs bounded breadth-first crawls
///
/// The scheduler owns a [`Fetcher`] and, through it, a robots.txt cache. The
/// cache outlives individual runs, so reusing a scheduler (or sharing the
/// cache between schedulers) avoids refetching robots.txt.
#[derive(Debug, Clone)]
pub struct CrawlScheduler {
    fetcher: Fetcher,
}

impl CrawlScheduler {
    /// Creates a scheduler with a fresh robots.txt cache
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration providing the user agent identity
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlScheduler)` - Ready to run crawls
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        let robots = Arc::new(RobotsCache::new(client.clone()));
        Ok(Self::from_parts(
            client,
            robots,
            config.user_agent.user_agent_string(),
        ))
    }

    /// Creates a scheduler that consults an existing robots.txt cache
    pub fn with_robots_cache(config: &Config, robots: Arc<RobotsCache>) -> Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::from_parts(
            client,
            robots,
            config.user_agent.user_agent_string(),
        ))
    }

    pub fn from_parts(client: Client, robots: Arc<RobotsCache>, user_agent: String) -> Self {
        Self {
            fetcher: Fetcher::new(client, robots, user_agent),
        }
    }

    /// The robots.txt cache used by this scheduler
    pub fn robots_cache(&self) -> &Arc<RobotsCache> {
        self.fetcher.robots()
    }

    /// Runs one crawl to completion
    ///
    /// # Algorithm
    ///
    /// 1. Normalize the seeds; invalid seeds are dropped
    /// 2. Pop entries in FIFO order until the frontier is empty or a budget
    ///    (pages, wall clock) is exhausted
    /// 3. Discard entries deeper than `max_depth` or outside the origin policy
    /// 4. Fetch (after the request delay), parse, record a result
    /// 5. Enqueue each new, allowed link at `depth + 1`
    ///
    /// Per-page failures never abort the run: fetch errors are logged and
    /// skipped, HTTP errors and parse failures are recorded.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<CrawlResult>)` - Results in discovery order
    /// * `Err(CrawlError::NoValidSeeds)` - No seed survived normalization
    pub async fn run(&self, request: &CrawlRequest) -> Result<Vec<CrawlResult>> {
        let started = Instant::now();
        let mut frontier = Frontier::new();
        let mut seed_origins = HashSet::new();

        for seed in request.seeds() {
            match normalize_url(seed, None) {
                Ok(url) => {
                    seed_origins.insert(origin_of(&url));
                    frontier.push(url, 0);
                }
                Err(e) => tracing::warn!("Ignoring seed {}: {}", seed, e),
            }
        }

        if frontier.is_empty() {
            return Err(CrawlError::NoValidSeeds);
        }

        let allowed = if request.same_origin_only() {
            Some(&seed_origins)
        } else {
            request.allowed_origins()
        };

        tracing::info!(
            "Starting crawl: {} seeds, max_pages={}, max_depth={}, timeout={:?}, same_origin_only={}",
            frontier.len(),
            request.max_pages(),
            request.max_depth(),
            request.timeout(),
            request.same_origin_only()
        );

        let mut results = Vec::new();

        while results.len() < request.max_pages() {
            let elapsed = started.elapsed();
            if elapsed >= request.timeout() {
                tracing::info!("Time budget of {:?} exhausted", request.timeout());
                break;
            }

            let Some(entry) = frontier.pop() else {
                tracing::debug!("Frontier is empty");
                break;
            };

            if entry.depth > request.max_depth() {
                tracing::debug!("Skipping {} (depth {} > {})", entry.url, entry.depth, request.max_depth());
                continue;
            }

            if !is_origin_allowed(&entry.url, allowed) {
                tracing::debug!("Skipping {} (origin not allowed)", entry.url);
                continue;
            }

            if !request.request_delay().is_zero() {
                tokio::time::sleep(request.request_delay()).await;
            }

            let remaining = request.timeout().saturating_sub(started.elapsed());
            if let Some(result) = self
                .process_entry(&entry, fetch_timeout_for(remaining), &mut frontier, allowed)
                .await
            {
                results.push(result);
            }
        }

        tracing::info!(
            "Crawl finished: {} results, {} URLs discovered, {} still queued, {:.1}s elapsed",
            results.len(),
            frontier.visited_count(),
            frontier.len(),
            started.elapsed().as_secs_f64()
        );

        Ok(results)
    }

    /// Fetches and parses one entry, enqueueing its links
    ///
    /// Returns `None` when the fetch failed at the network level.
    async fn process_entry(
        &self,
        entry: &FrontierEntry,
        fetch_timeout: Duration,
        frontier: &mut Frontier,
        allowed: Option<&HashSet<String>>,
    ) -> Option<CrawlResult> {
        tracing::debug!("Fetching {} (depth {}, timeout {:?})", entry.url, entry.depth, fetch_timeout);

        let page = match self.fetcher.fetch(&entry.url, fetch_timeout, true).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", entry.url, e);
                return None;
            }
        };

        if page.is_robots_denied() {
            return Some(CrawlResult::robots_denied(entry));
        }

        if !page.is_parseable() {
            tracing::debug!("No content from {} (status {})", entry.url, page.status);
            return Some(CrawlResult::status_only(entry, page.status));
        }

        let parsed = match parse_html(&page.body, &entry.url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Parse failed for {}: {}", entry.url, e);
                return Some(CrawlResult::parse_failed(entry, page.status, &e.to_string()));
            }
        };

        let queued = enqueue_links(frontier, entry, &parsed.links, allowed);
        tracing::debug!(
            "Parsed {}: {} links, {} newly queued",
            entry.url,
            parsed.links.len(),
            queued
        );

        Some(CrawlResult::from_page(entry, page.status, &parsed))
    }
}

/// Normalizes discovered links and enqueues the new, allowed ones
///
/// A link rejected by the origin policy is not marked visited, so it is
/// evaluated again if another page links to it.
fn enqueue_links(
    frontier: &mut Frontier,
    entry: &FrontierEntry,
    links: &[String],
    allowed: Option<&HashSet<String>>,
) -> usize {
    let mut queued = 0;

    for link in links {
        let url = match normalize_url(link, Some(&entry.url)) {
            Ok(url) => url,
            Err(e) => {
                tracing::trace!("Dropping link {}: {}", link, e);
                continue;
            }
        };

        if frontier.is_visited(&url) || !is_origin_allowed(&url, allowed) {
            continue;
        }

        if frontier.push(url, entry.depth + 1) {
            queued += 1;
        }
    }

    queued
}

/// Runs a single crawl with a fresh scheduler
///
/// # Example
///
/// ```no_run
/// use crawlbot::config::Config;
/// use crawlbot::crawler::{run_crawl, CrawlRequest};
///
/// # async fn example() -> crawlbot::Result<()> {
/// let request = CrawlRequest::new(["https://example.com/"]).with_max_pages(10);
/// let results = run_crawl(&Config::default(), &request).await?;
/// println!("Crawled {} pages", results.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, request: &CrawlRequest) -> Result<Vec<CrawlResult>> {
    CrawlScheduler::new(config)?.run(request).await
}
