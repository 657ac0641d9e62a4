// src/crawl/stats.rs
// Counters shared by every worker, and the summary we print at the end.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct CrawlStats {
    saved: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
    discovered: AtomicUsize,
}

impl CrawlStats {
    pub fn record_saved(&self) {
        self.saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discovered(&self, count: usize) {
        self.discovered.fetch_add(count, Ordering::Relaxed);
    }

    pub fn summary(&self) -> CrawlSummary {
        CrawlSummary {
            pages_saved: self.saved.load(Ordering::Relaxed),
            links_skipped: self.skipped.load(Ordering::Relaxed),
            links_failed: self.failed.load(Ordering::Relaxed),
            links_discovered: self.discovered.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    /// Pages fetched and written to disk.
    pub pages_saved: usize,
    /// Links dropped because they were already visited or on disk.
    pub links_skipped: usize,
    /// Links whose fetch, save or extraction failed.
    pub links_failed: usize,
    /// In-scope, unvisited links pushed back onto the frontier.
    pub links_discovered: usize,
}
