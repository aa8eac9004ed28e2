//! Per-origin robots.txt cache
//!
//! Entries are fetched on first use and kept for the lifetime of the cache.
//! Nothing is ever evicted, so within a crawl run an origin's policy is read
//! exactly once. Share one cache between runs by cloning the `Arc` that owns
//! it, or give each run a fresh one.
//!
//! Fetching is fail-open: a missing, unreachable, or unreadable robots.txt
//! is cached as "no restrictions".

use crate::robots::ParsedRobots;
use crate::url::origin_of;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

/// Upper bound for a single robots.txt request
pub const ROBOTS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How a cached robots.txt entry was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsSource {
    /// robots.txt was served with HTTP 200 and parsed
    Fetched,
    /// The server answered with a non-200 status
    Missing { status: u16 },
    /// The request or body read failed
    Unreachable { error: String },
}

/// Cached robots.txt data for one origin
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt content
    pub robots: ParsedRobots,

    /// How the content was obtained
    pub source: RobotsSource,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    /// Creates a new CachedRobots stamped with the current time
    pub fn new(robots: ParsedRobots, source: RobotsSource) -> Self {
        Self {
            robots,
            source,
            fetched_at: Utc::now(),
        }
    }

    /// Checks if a URL is allowed according to the cached robots.txt
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.robots.is_allowed(url, user_agent)
    }
}

/// Process- or run-scoped cache of robots.txt policies keyed by origin
#[derive(Debug)]
pub struct RobotsCache {
    client: Client,
    entries: RwLock<HashMap<String, Arc<CachedRobots>>>,
}

impl RobotsCache {
    /// Creates an empty cache that fetches with the given client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns true unless robots.txt for the URL's origin disallows `user_agent`
    pub async fn can_fetch(&self, url: &Url, user_agent: &str) -> bool {
        self.can_fetch_within(url, user_agent, ROBOTS_FETCH_TIMEOUT)
            .await
    }

    /// Same as [`can_fetch`](Self::can_fetch), with a tighter bound on the
    /// robots.txt request if one has to be made
    pub async fn can_fetch_within(&self, url: &Url, user_agent: &str, timeout: Duration) -> bool {
        let entry = self.get_or_fetch(url, user_agent, timeout).await;
        entry.is_allowed(url.as_str(), user_agent)
    }

    /// Returns the cached entry for the URL's origin, fetching it on first use
    pub async fn get_or_fetch(
        &self,
        url: &Url,
        user_agent: &str,
        timeout: Duration,
    ) -> Arc<CachedRobots> {
        let origin = origin_of(url);

        if let Some(entry) = self.entries.read().await.get(&origin) {
            tracing::trace!("Using cached robots.txt for {}", origin);
            return Arc::clone(entry);
        }

        let fetched = Arc::new(
            fetch_robots(
                &self.client,
                &origin,
                user_agent,
                timeout.min(ROBOTS_FETCH_TIMEOUT),
            )
            .await,
        );

        // Another caller may have filled the slot while we were fetching.
        // First entry wins.
        let mut entries = self.entries.write().await;
        Arc::clone(entries.entry(origin).or_insert(fetched))
    }

    /// Returns the cached entry for an origin key, if any
    pub async fn get(&self, origin: &str) -> Option<Arc<CachedRobots>> {
        self.entries.read().await.get(origin).cloned()
    }

    /// Number of origins cached
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no origin has been cached yet
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Fetches and parses `<origin>/robots.txt`, falling back to allow-all
///
/// # Arguments
///
/// * `client` - HTTP client to use
/// * `origin` - Origin key (`scheme://host[:port]`)
/// * `user_agent` - The user agent string sent with the request
/// * `timeout` - Bound on the whole request
pub async fn fetch_robots(
    client: &Client,
    origin: &str,
    user_agent: &str,
    timeout: Duration,
) -> CachedRobots {
    let robots_url = format!("{}/robots.txt", origin);
    tracing::debug!("Fetching robots.txt: {}", robots_url);

    let response = client
        .get(&robots_url)
        .header(reqwest::header::USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await;

    match response {
        Ok(resp) if resp.status().as_u16() == 200 => match resp.text().await {
            Ok(body) => CachedRobots::new(ParsedRobots::from_content(&body), RobotsSource::Fetched),
            Err(e) => {
                tracing::debug!("robots.txt body read failed for {}: {}", origin, e);
                CachedRobots::new(
                    ParsedRobots::allow_all(),
                    RobotsSource::Unreachable {
                        error: e.to_string(),
                    },
                )
            }
        },
        Ok(resp) => {
            let status = resp.status().as_u16();
            tracing::debug!("No robots.txt for {} (HTTP {})", origin, status);
            CachedRobots::new(ParsedRobots::allow_all(), RobotsSource::Missing { status })
        }
        Err(e) => {
            tracing::debug!("robots.txt fetch failed for {}: {}", origin, e);
            CachedRobots::new(
                ParsedRobots::allow_all(),
                RobotsSource::Unreachable {
                    error: e.to_string(),
                },
            )
        }
    }
}
