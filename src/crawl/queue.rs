// src/crawl/queue.rs
// =============================================================================
// This module holds the crawl frontier and the visited set.
//
// How it works:
// 1. Start with the root link "/" in the frontier
// 2. next() takes the first link off the frontier and marks it visited
// 3. merge() appends newly found links to the end of the frontier, skipping
//    any link that is already visited, already queued, or repeated in the
//    same batch
// 4. Repeat until next() returns None
//
// Because a link is marked visited the moment it is handed out, and merge()
// never re-queues a visited link, every link is handed out at most once and
// the crawl always ends, even on sites full of cycles.
//
// Rust concepts:
// - VecDeque: FIFO frontier (push_back / pop_front)
// - HashSet: O(1) membership checks next to the ordered Vecs
// =============================================================================

use std::collections::{HashSet, VecDeque};

/// Root link every crawl starts from
pub const ROOT_LINK: &str = "/";

#[derive(Debug, Clone)]
pub struct VisitQueue {
    // Links in the order they were visited
    visited: Vec<String>,
    visited_set: HashSet<String>,
    frontier: VecDeque<String>,
    frontier_set: HashSet<String>,
}

impl VisitQueue {
    pub fn new(root: &str) -> Self {
        let mut queue = VisitQueue {
            visited: Vec::new(),
            visited_set: HashSet::new(),
            frontier: VecDeque::new(),
            frontier_set: HashSet::new(),
        };
        queue.merge([root.to_string()]);
        queue
    }

    /// Takes the next link to visit and records it as visited
    pub fn next(&mut self) -> Option<String> {
        let link = self.frontier.pop_front()?;
        self.frontier_set.remove(&link);
        self.visited_set.insert(link.clone());
        self.visited.push(link.clone());
        Some(link)
    }

    /// Appends links that are neither visited nor already queued
    ///
    /// Returns how many links were actually added.
    pub fn merge<I>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut added = 0;
        for link in links {
            if self.visited_set.contains(&link) || self.frontier_set.contains(&link) {
                continue;
            }
            self.frontier_set.insert(link.clone());
            self.frontier.push_back(link);
            added += 1;
        }
        added
    }

    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    pub fn is_visited(&self, link: &str) -> bool {
        self.visited_set.contains(link)
    }

    pub fn is_queued(&self, link: &str) -> bool {
        self.frontier_set.contains(link)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Links still waiting once the next one has been handed out
    pub fn remaining_after_next(&self) -> usize {
        self.frontier.len().saturating_sub(1)
    }
}

impl Default for VisitQueue {
    fn default() -> Self {
        Self::new(ROOT_LINK)
    }
}
