//! Breadth-first crawl frontier
//!
//! This module handles:
//! - The FIFO queue of URLs waiting to be fetched
//! - The pending set mirroring that queue
//! - The visited set of URLs already dequeued
//!
//! A canonical URL enters the frontier at most once per run: `push` is a
//! no-op for anything already pending or visited, and `pop` moves the head
//! from pending to visited.

use crate::url::CanonicalUrl;
use std::collections::{HashSet, VecDeque};

/// A URL queued for fetching with its traversal metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Canonical URL to fetch
    pub url: CanonicalUrl,

    /// Link distance from the seed (seeds are depth 0)
    pub depth: u32,

    /// Page the link was found on, `None` for seeds
    pub discovered_from: Option<CanonicalUrl>,
}

impl FrontierEntry {
    /// Creates a depth-0 entry for a seed
    pub fn seed(url: CanonicalUrl) -> Self {
        Self {
            url,
            depth: 0,
            discovered_from: None,
        }
    }

    /// Creates an entry for a link found on `parent`
    pub fn child(url: CanonicalUrl, parent: &FrontierEntry) -> Self {
        Self {
            url,
            depth: parent.depth + 1,
            discovered_from: Some(parent.url.clone()),
        }
    }
}

/// Deduplicated FIFO work queue plus the visited set
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    pending: HashSet<CanonicalUrl>,
    visited: HashSet<CanonicalUrl>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `entry` unless its URL is already pending or visited
    ///
    /// Returns true if the entry was appended.
    pub fn push(&mut self, entry: FrontierEntry) -> bool {
        if self.contains(&entry.url) {
            return false;
        }
        self.pending.insert(entry.url.clone());
        self.queue.push_back(entry);
        true
    }

    /// Removes the head of the queue and marks it visited
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        let entry = self.queue.pop_front()?;
        self.pending.remove(&entry.url);
        self.visited.insert(entry.url.clone());
        Some(entry)
    }

    /// Queues depth-0 entries for the given seeds
    ///
    /// Returns how many were actually added after deduplication.
    pub fn seed<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = CanonicalUrl>,
    {
        urls.into_iter()
            .filter(|url| self.push(FrontierEntry::seed(url.clone())))
            .count()
    }

    /// True if `url` is pending or visited
    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        self.pending.contains(url) || self.visited.contains(url)
    }

    pub fn is_visited(&self, url: &CanonicalUrl) -> bool {
        self.visited.contains(url)
    }

    pub fn is_pending(&self, url: &CanonicalUrl) -> bool {
        self.pending.contains(url)
    }

    /// Number of entries waiting to be popped
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
