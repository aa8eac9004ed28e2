//! Breadth-first crawl frontier
//!
//! A FIFO queue of `(url, depth)` entries plus the set of normalized URLs that
//! have ever been enqueued in this run. Membership is checked before enqueue,
//! so each normalized URL is handed out at most once.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The normalized URL to fetch
    pub url: Url,

    /// Link distance from the seeds (seeds are depth 0)
    pub depth: u32,
}

#[derive(Debug, Default)]
pub struct Frontier {
    /// Entries waiting to be fetched, oldest first
    queue: VecDeque<FrontierEntry>,

    /// Normalized URL strings already enqueued this run
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `url` at `depth` unless it was enqueued before
    ///
    /// Returns true if the URL was new. The caller is expected to pass an
    /// already-normalized URL.
    pub fn push(&mut self, url: Url, depth: u32) -> bool {
        if !self.visited.insert(url.as_str().to_string()) {
            return false;
        }

        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Removes and returns the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Number of entries waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct URLs enqueued so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
