//! Robots.txt handling module
//!
//! This module provides fetching, parsing, and per-origin caching of
//! robots.txt files. Lookups fail open: anything short of a readable
//! robots.txt that disallows the path means the URL may be fetched.

mod cache;
mod parser;

pub use cache::{fetch_robots, CachedRobots, RobotsCache, RobotsSource, ROBOTS_FETCH_TIMEOUT};
pub use parser::{agent_token, ParsedRobots};
