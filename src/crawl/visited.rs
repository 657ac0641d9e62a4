// src/crawl/visited.rs
// =============================================================================
// The visited tracker answers one question: "has this link already been done?"
//
// A link counts as done when either:
// - a worker already fetched it (or is fetching it right now) in this run, or
// - a page for it is already stored on disk from a previous run.
//
// The home page is the exception to the disk rule. Its file always exists
// after the first run, but we still want to re-read it on every restart so we
// pick up links we have not mirrored yet.
//
// Concurrency:
// Every worker shares one tracker through an Arc. `try_claim` checks memory,
// stats the disk WITHOUT the lock held, then re-checks memory and records the
// claim under the lock. So two workers can never both decide to fetch the same
// link, and no worker ever waits on another worker's disk stat.
//
// Rust concepts:
// - Mutex<HashMap>: the map can only be touched through the guard `lock()`
//   returns; the guard unlocks when it goes out of scope
// - `self.lock().contains_key(..)` in an `if`: the guard is a temporary, so
//   the lock is already released when the `if` body runs
// =============================================================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::scope::{Scope, HOME_IDENTIFIER};
use super::store::PageStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    /// A worker has claimed the link and is fetching it.
    InFlight,
    /// The link was fetched successfully this run.
    Fetched,
}

/// Shared record of which links are done.
#[derive(Debug)]
pub struct VisitedTracker {
    scope: Scope,
    store: PageStore,
    links: Mutex<HashMap<String, LinkState>>,
}

impl VisitedTracker {
    pub fn new(scope: Scope, store: PageStore) -> Self {
        Self {
            scope,
            store,
            links: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true if the link was seen this run or is already on disk.
    pub fn is_visited(&self, link: &str) -> bool {
        // Memory first; the lock is released before we touch the disk.
        if self.lock().contains_key(link) {
            return true;
        }
        self.stored_on_disk(link)
    }

    /// Atomically checks that `link` is not visited and claims it.
    ///
    /// Returns false if the link is visited or another worker holds its claim.
    pub fn try_claim(&self, link: &str) -> bool {
        if self.lock().contains_key(link) {
            return false;
        }

        // The stat runs without the lock so other workers are never stuck
        // behind the disk. Only the stored page's existence is decided here.
        if self.stored_on_disk(link) {
            return false;
        }

        // Re-check: another worker may have claimed it while we were on disk.
        let mut links = self.lock();
        if links.contains_key(link) {
            return false;
        }
        links.insert(link.to_string(), LinkState::InFlight);
        true
    }

    /// Records a successful fetch.
    pub fn mark_fetched(&self, link: &str) {
        self.lock().insert(link.to_string(), LinkState::Fetched);
    }

    /// Drops an in-flight claim whose fetch failed, so the link can be retried
    /// if it is discovered again. Fetched links are left alone.
    pub fn release(&self, link: &str) {
        let mut links = self.lock();
        if links.get(link) == Some(&LinkState::InFlight) {
            links.remove(link);
        }
    }

    /// Number of links fetched successfully this run.
    pub fn fetched_count(&self) -> usize {
        self.lock()
            .values()
            .filter(|state| **state == LinkState::Fetched)
            .count()
    }

    // The home page never counts as stored: it is re-read on every run.
    fn stored_on_disk(&self, link: &str) -> bool {
        let identifier = self.scope.derive_identifier(link);
        if identifier == HOME_IDENTIFIER {
            return false;
        }

        self.store.contains(&identifier)
    }

    // A panic in another worker must not take the whole crawl down with it;
    // the map is still consistent because every update is a single insert/remove.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, LinkState>> {
        self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn tracker(base: &str, dir: &std::path::Path) -> VisitedTracker {
        VisitedTracker::new(Scope::new(base), PageStore::new(dir))
    }

    #[test]
    fn test_unknown_link_is_not_visited() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker("https://go.dev", dir.path());
        assert!(!tracker.is_visited("https://go.dev/doc"));
    }

    #[test]
    fn test_claimed_and_fetched_links_are_visited() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker("https://go.dev", dir.path());

        assert!(tracker.try_claim("https://go.dev/doc"));
        assert!(tracker.is_visited("https://go.dev/doc"));
        assert!(!tracker.try_claim("https://go.dev/doc"));

        tracker.mark_fetched("https://go.dev/doc");
        assert!(tracker.is_visited("https://go.dev/doc"));
        assert_eq!(tracker.fetched_count(), 1);
    }

    #[test]
    fn test_release_forgets_failed_claims_only() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = tracker("https://go.dev", dir.path());

        assert!(tracker.try_claim("https://go.dev/a"));
        tracker.release("https://go.dev/a");
        assert!(!tracker.is_visited("https://go.dev/a"));

        assert!(tracker.try_claim("https://go.dev/b"));
        tracker.mark_fetched("https://go.dev/b");
        tracker.release("https://go.dev/b");
        assert!(tracker.is_visited("https://go.dev/b"));
    }

    #[tokio::test]
    async fn test_resume_from_stored_page() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());
        store.save("doc", b"<html></html>").await.unwrap();

        let tracker = VisitedTracker::new(Scope::new("https://go.dev"), store);

        // Visited because the file exists, without any fetch this run.
        assert!(tracker.is_visited("https://go.dev/doc"));
        assert!(!tracker.is_visited("https://go.dev/docs"));
        assert!(!tracker.try_claim("https://go.dev/doc"));
    }

    #[tokio::test]
    async fn test_home_is_never_visited_by_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());
        store.save(HOME_IDENTIFIER, b"<html></html>").await.unwrap();

        let tracker = VisitedTracker::new(Scope::new("https://go.dev"), store);

        assert!(!tracker.is_visited("https://go.dev"));
        assert!(!tracker.is_visited("https://go.dev/"));

        // Still suppressed once it has been seen in memory.
        assert!(tracker.try_claim("https://go.dev"));
        assert!(tracker.is_visited("https://go.dev"));
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Arc::new(tracker("https://go.dev", dir.path()));
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let tracker = tracker.clone();
                let winners = winners.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let link = format!("https://go.dev/page/{}", i);
                        if tracker.try_claim(&link) {
                            winners.fetch_add(1, Ordering::SeqCst);
                            tracker.mark_fetched(&link);
                        }
                        let _ = tracker.is_visited(&link);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 50);
        assert_eq!(tracker.fetched_count(), 50);
    }
}
