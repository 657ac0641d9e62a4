// src/crawl/mod.rs
// =============================================================================
// This module is the crawl-and-persist engine.
//
// Submodules (leaves first):
// - scope: which links belong to the site, and what file each one becomes
// - store: writes pages to disk
// - visited: remembers what is done, in memory and on disk
// - fetch / extract: the network and HTML parsing
// - processor: one link's journey, fetch -> save -> extract -> filter
// - frontier / pool: the shared queue and the workers draining it
// =============================================================================

mod error;
mod extract;
mod fetch;
mod frontier;
mod pool;
mod processor;
mod scope;
mod stats;
mod store;
mod visited;

pub use fetch::HttpFetcher;
pub use pool::WorkerPool;
pub use processor::CrawlProcessor;
pub use scope::Scope;
pub use stats::CrawlSummary;
pub use store::PageStore;
