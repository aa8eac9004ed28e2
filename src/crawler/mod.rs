//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind a robots.txt check
//! - HTML parsing and link extraction
//! - The breadth-first frontier and visited set
//! - The bounded run loop that ties them together

mod fetcher;
mod frontier;
mod parser;
mod request;
mod result;
mod scheduler;

pub use fetcher::{
    build_http_client, is_html_content_type, FetchedPage, Fetcher, ACCEPT_HTML, MAX_BODY_BYTES,
    ROBOTS_DENIED_STATUS,
};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{parse_html, ParsedPage, MAX_TEXT_CHARS};
pub use request::{parse_seed_list, CrawlRequest};
pub use result::{
    make_snippet, CrawlResult, PARSE_ERROR_MAX_CHARS, ROBOTS_DENIED_SNIPPET, SNIPPET_MAX_CHARS,
};
pub use scheduler::{
    fetch_timeout_for, run_crawl, CrawlScheduler, FETCH_TIMEOUT_CEILING, MIN_FETCH_TIMEOUT,
};
