//! Pending-URL queue owned by the crawl loop
//!
//! The frontier is private to the crawler: it starts with the seed URL and
//! only grows by the targets of anchors found on crawled pages. It keeps no
//! visited set, so a URL reached through several paths is fetched once per
//! path; indexing dedup happens downstream.

use std::collections::VecDeque;

/// FIFO of URL strings waiting to be fetched
#[derive(Debug, Default)]
pub struct Frontier {
    pending: VecDeque<String>,
}

impl Frontier {
    /// Creates a frontier pre-loaded with the seed URL
    pub fn new(seed: impl Into<String>) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(seed.into());
        Self { pending }
    }

    /// Appends a URL to the back of the queue
    pub fn push(&mut self, url: impl Into<String>) {
        self.pending.push_back(url.into());
    }

    /// Takes the URL at the front of the queue
    pub fn pop(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
