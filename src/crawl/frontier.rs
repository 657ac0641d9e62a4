// src/crawl/frontier.rs
// =============================================================================
// The frontier is the shared queue of links waiting to be crawled.
//
// How it works:
// 1. The pool pushes the seed URL
// 2. Workers take links with `next()`
// 3. After processing a link, a worker pushes what it found and calls
//    `complete()` for the link it took
// 4. When nothing is queued and nothing is being processed, the frontier
//    closes and every `next()` returns None
//
// Capacity policy: the queue is UNBOUNDED. A worker pushing discovered links
// never waits, so it can never deadlock against its own queue when all other
// workers are busy pushing too.
//
// The frontier does not deduplicate. The same link can sit in the queue many
// times; the crawl processor drops the repeats.
//
// Rust concepts:
// - mpsc: "multi-producer, single-consumer" channel. We share the single
//   receiver between workers by putting it behind an async Mutex.
// - AtomicUsize: a counter many tasks can update without a lock
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub struct Frontier {
    // Dropped (set to None) once the crawl runs out of work; that is what
    // wakes up receivers with `None`.
    sender: Mutex<Option<UnboundedSender<String>>>,
    receiver: tokio::sync::Mutex<UnboundedReceiver<String>>,
    // Links pushed but not yet completed.
    outstanding: AtomicUsize,
}

impl Frontier {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: tokio::sync::Mutex::new(receiver),
            outstanding: AtomicUsize::new(0),
        }
    }

    /// Queues a link. Never blocks. Returns false if the frontier is closed.
    pub fn push(&self, link: String) -> bool {
        let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = guard.as_ref() else {
            return false;
        };

        // Count before sending so a fast worker can't complete it first.
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        if sender.send(link).is_err() {
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            return false;
        }
        true
    }

    /// Waits for the next link. Returns None once the frontier is closed and
    /// drained.
    pub async fn next(&self) -> Option<String> {
        self.receiver.lock().await.recv().await
    }

    /// Marks one link taken with `next()` as fully handled. Its children must
    /// already have been pushed.
    pub fn complete(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.close();
        }
    }

    /// Closes the frontier: no more pushes, and receivers see None once the
    /// queue is empty.
    pub fn close(&self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Links pushed but not yet completed.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}
