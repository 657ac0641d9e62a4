// src/crawl/pool.rs
// =============================================================================
// The worker pool: a fixed number of tokio tasks sharing one frontier.
//
// Each worker loops:
// 1. Stop if shutdown was requested
// 2. Otherwise wait for a link (or for shutdown, whichever comes first)
// 3. Run the crawl processor on it
// 4. Push every new link back onto the frontier, then mark the link complete
//
// A failing link is logged and counted; it never stops the other workers.
// The crawl ends when the frontier runs dry or shutdown is signaled.
// Shutdown is only checked between links: a fetch that is already running is
// allowed to finish.
// =============================================================================

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::frontier::Frontier;
use super::processor::CrawlProcessor;
use super::stats::CrawlSummary;

pub struct WorkerPool {
    processor: Arc<CrawlProcessor>,
    frontier: Arc<Frontier>,
    workers: usize,
}

impl WorkerPool {
    pub fn new(processor: Arc<CrawlProcessor>, workers: usize) -> Self {
        Self {
            processor,
            frontier: Arc::new(Frontier::new()),
            workers: workers.max(1),
        }
    }

    /// Seeds the frontier with `seed` and crawls until the frontier is
    /// exhausted or `shutdown` flips to true. Waits for every worker to exit.
    pub async fn run(&self, seed: &str, shutdown: watch::Receiver<bool>) -> CrawlSummary {
        self.frontier.push(seed.to_string());
        info!(seed = %seed, workers = self.workers, "starting crawl");

        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                tokio::spawn(worker(
                    id,
                    self.processor.clone(),
                    self.frontier.clone(),
                    shutdown.clone(),
                ))
            })
            .collect();

        for result in join_all(handles).await {
            if let Err(e) = result {
                error!(error = %e, "worker task panicked");
            }
        }

        self.frontier.close();
        let summary = self.processor.stats().summary();
        info!(
            saved = summary.pages_saved,
            fetched = self.processor.visited().fetched_count(),
            failed = summary.links_failed,
            pending = self.frontier.outstanding(),
            "all workers stopped"
        );
        summary
    }
}

async fn worker(
    id: usize,
    processor: Arc<CrawlProcessor>,
    frontier: Arc<Frontier>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let link = tokio::select! {
            biased;
            changed = shutdown.changed() => {
                // A dropped sender can never signal again; treat it as shutdown.
                if changed.is_err() {
                    break;
                }
                continue;
            }
            next = frontier.next() => match next {
                Some(link) => link,
                None => break,
            },
        };

        match processor.process(&link).await {
            Ok(links) => {
                for new_link in links {
                    frontier.push(new_link);
                }
            }
            Err(e) => {
                processor.stats().record_failed();
                warn!(worker = id, link = %e.link(), stage = e.stage(), error = %e, "failed to process link");
            }
        }

        frontier.complete();
    }

    debug!(worker = id, "worker stopped");
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is tokio::select!?
//    - Waits on several futures at once and runs the branch of whichever
//      finishes first; the others are dropped (cancelled)
//    - `biased;` checks branches top to bottom, so shutdown always wins a tie
//
// 2. What is a watch channel?
//    - A single value that many receivers can observe
//    - `borrow()` reads the current value, `changed()` waits for a new one
//    - Perfect for a "stop now" flag shared by every worker
//
// 3. Why Arc<CrawlProcessor>?
//    - Every worker task needs the same processor (and its visited set)
//    - Arc = "atomically reference counted": cloning it is cheap and the
//      processor lives until the last worker drops its handle
// -----------------------------------------------------------------------------
