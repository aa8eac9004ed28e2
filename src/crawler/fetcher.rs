//! HTTP fetcher implementation
//!
//! This module handles page requests for the crawler:
//! - Building the HTTP client with the crawler's user agent string
//! - Consulting the robots.txt cache before any page request
//! - A single GET per page, following redirects
//! - Content-Type gating so that only HTML bodies reach the parser
//! - A cap on how much of a body is read

use crate::config::UserAgentConfig;
use crate::robots::{RobotsCache, ROBOTS_FETCH_TIMEOUT};
use crate::CrawlError;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect::Policy, Client, Response};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Status reported for a page that robots.txt does not allow us to fetch
pub const ROBOTS_DENIED_STATUS: u16 = 0;

/// Accept header sent with every page request
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// Maximum number of redirects followed for one page
const MAX_REDIRECTS: usize = 10;

/// Default cap on the bytes read from one page body
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Outcome of a page request that reached the server (or was refused by policy)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code, or [`ROBOTS_DENIED_STATUS`]
    pub status: u16,

    /// Media type without parameters, lowercased (empty if absent)
    pub content_type: String,

    /// Page body; empty for non-HTML responses and robots denials
    pub body: String,
}

impl FetchedPage {
    /// The sentinel page returned when robots.txt disallows the URL
    pub fn robots_denied() -> Self {
        Self {
            status: ROBOTS_DENIED_STATUS,
            content_type: String::new(),
            body: String::new(),
        }
    }

    pub fn is_robots_denied(&self) -> bool {
        self.status == ROBOTS_DENIED_STATUS
    }

    /// True when the page is a 200 response with an HTML body worth parsing
    pub fn is_parseable(&self) -> bool {
        self.status == 200 && !self.body.is_empty()
    }
}

/// Builds an HTTP client with proper configuration
///
/// No overall request timeout is set here: every call passes its own.
///
/// # Example
///
/// ```no_run
/// use crawlbot::config::UserAgentConfig;
/// use crawlbot::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true for the HTML family of media types
pub fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml")
}

/// Polite page fetcher: robots.txt check, then one GET
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    robots: Arc<RobotsCache>,
    user_agent: String,
    max_body_bytes: usize,
}

impl Fetcher {
    pub fn new(client: Client, robots: Arc<RobotsCache>, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            robots,
            user_agent: user_agent.into(),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    /// Sets how many body bytes are read before the rest is dropped
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// The robots.txt cache consulted by this fetcher
    pub fn robots(&self) -> &Arc<RobotsCache> {
        &self.robots
    }

    /// Fetches a single page
    ///
    /// # Request Flow
    ///
    /// 1. If `check_robots` is set, ask the robots.txt cache; a denial returns
    ///    [`FetchedPage::robots_denied`] without touching the page
    /// 2. GET with the crawler user agent and an HTML `Accept` header
    /// 3. Non-HTML responses keep their status and content type but lose the body
    /// 4. HTML bodies are read up to the byte cap; anything past it is dropped
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `timeout` - Bound on the whole request, body included
    /// * `check_robots` - Whether robots.txt must be consulted first
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - The server answered (any status), or robots denied
    /// * `Err(CrawlError)` - Network-level failure: DNS, connect, timeout, body read
    pub async fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
        check_robots: bool,
    ) -> Result<FetchedPage, CrawlError> {
        if check_robots {
            let robots_timeout = timeout.min(ROBOTS_FETCH_TIMEOUT);
            if !self
                .robots
                .can_fetch_within(url, &self.user_agent, robots_timeout)
                .await
            {
                tracing::info!("Robots.txt disallows: {}", url);
                return Ok(FetchedPage::robots_denied());
            }
        }

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| CrawlError::from_request(url.as_str(), e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if !is_html_content_type(&content_type) {
            tracing::debug!("Skipping body of {} ({})", url, content_type);
            return Ok(FetchedPage {
                status,
                content_type,
                body: String::new(),
            });
        }

        let body = read_body_capped(response, url, self.max_body_bytes).await?;

        Ok(FetchedPage {
            status,
            content_type,
            body,
        })
    }
}

/// Reads at most `max_bytes` of the body, decoding it as lossy UTF-8
async fn read_body_capped(
    mut response: Response,
    url: &Url,
    max_bytes: usize,
) -> Result<String, CrawlError> {
    let mut bytes = Vec::new();

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| CrawlError::from_request(url.as_str(), e))?
    {
        let room = max_bytes - bytes.len();
        if chunk.len() >= room {
            bytes.extend_from_slice(&chunk[..room]);
            if chunk.len() > room {
                tracing::debug!("Body of {} truncated at {} bytes", url, max_bytes);
            }
            break;
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
