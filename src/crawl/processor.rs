// src/crawl/processor.rs
// =============================================================================
// The crawl processor takes ONE link through its whole life:
//
//   1. skip     - already visited (or another worker has it)? return nothing
//   2. fetch    - download it; only now does it count as visited
//   3. name     - derive the identifier we save it under
//   4. persist  - write the body to the page store
//   5. extract  - pull the raw hrefs out of the body
//   6. filter   - make root-relative hrefs absolute, keep the in-scope,
//                 unvisited ones
//
// The first failing stage stops the pipeline and its error comes back to the
// caller tagged with the link and stage. Nothing is rolled back: if extraction
// fails, the page stays saved.
// =============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::error::CrawlError;
use super::extract::extract_anchor_targets;
use super::fetch::Fetcher;
use super::scope::Scope;
use super::stats::CrawlStats;
use super::store::PageStore;
use super::visited::VisitedTracker;

pub struct CrawlProcessor {
    scope: Scope,
    store: PageStore,
    visited: VisitedTracker,
    fetcher: Arc<dyn Fetcher>,
    stats: CrawlStats,
}

impl CrawlProcessor {
    pub fn new(scope: Scope, store: PageStore, fetcher: Arc<dyn Fetcher>) -> Self {
        let visited = VisitedTracker::new(scope.clone(), store.clone());
        Self {
            scope,
            store,
            visited,
            fetcher,
            stats: CrawlStats::default(),
        }
    }

    pub fn visited(&self) -> &VisitedTracker {
        &self.visited
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Processes one link and returns the new links found on it.
    ///
    /// A visited link is not an error: it yields an empty list.
    pub async fn process(&self, link: &str) -> Result<Vec<String>, CrawlError> {
        if !self.visited.try_claim(link) {
            debug!(link = %link, "already visited, skipping");
            self.stats.record_skipped();
            return Ok(Vec::new());
        }

        let page = match self.fetcher.fetch(link).await {
            Ok(page) => page,
            Err(source) => {
                self.visited.release(link);
                return Err(CrawlError::Fetch {
                    link: link.to_string(),
                    source,
                });
            }
        };
        self.visited.mark_fetched(link);

        if !page.is_success() {
            debug!(link = %link, status = page.status, "non-success status, saving anyway");
        }

        let identifier = self.scope.derive_identifier(link);

        let path = self
            .store
            .save(&identifier, &page.body)
            .await
            .map_err(|source| CrawlError::Persist {
                link: link.to_string(),
                path: self.store.path_for(&identifier),
                source,
            })?;
        self.stats.record_saved();
        info!(link = %link, path = %path.display(), bytes = page.body.len(), "saved page");

        let targets =
            extract_anchor_targets(&page.body).map_err(|reason| CrawlError::Extract {
                link: link.to_string(),
                reason,
            })?;

        let links = self.filter_targets(targets);
        self.stats.record_discovered(links.len());
        debug!(link = %link, new_links = links.len(), "extracted links");

        Ok(links)
    }

    // Resolve first, then check scope and visited state. A target that shows up
    // twice on the same page is only returned once.
    fn filter_targets(&self, targets: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();

        targets
            .into_iter()
            .map(|target| self.scope.resolve(&target))
            .filter(|link| self.scope.is_in_scope(link))
            .filter(|link| !self.visited.is_visited(link))
            .filter(|link| seen.insert(link.clone()))
            .collect()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn Fetcher>?
//    - `dyn Fetcher` is "some type that implements Fetcher", picked at runtime
//    - main passes the real HttpFetcher; the tests pass an in-memory site
//
// 2. What does `?` do in `process`?
//    - On Err it returns early, converting the error with `map_err` first so
//      it carries the link and the failing stage
//
// 3. Why is `seen.insert(..)` inside `filter`?
//    - HashSet::insert returns false when the value was already there, so the
//      second copy of a link is filtered out
// -----------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::crawl::fetch::FetchedPage;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// An in-memory website. Unknown links fail like an unreachable host.
    #[derive(Default)]
    pub(crate) struct StubSite {
        // link -> (status, body)
        pages: HashMap<String, (u16, String)>,
        requests: Mutex<Vec<String>>,
    }

    impl StubSite {
        pub(crate) fn with_page(self, link: &str, html: &str) -> Self {
            self.with_status_page(link, 200, html)
        }

        pub(crate) fn with_status_page(mut self, link: &str, status: u16, html: &str) -> Self {
            self.pages
                .insert(link.to_string(), (status, html.to_string()));
            self
        }

        pub(crate) fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StubSite {
        async fn fetch(&self, link: &str) -> anyhow::Result<FetchedPage> {
            self.requests.lock().unwrap().push(link.to_string());
            match self.pages.get(link) {
                Some((status, html)) => Ok(FetchedPage {
                    status: *status,
                    body: html.clone().into_bytes(),
                }),
                None => Err(anyhow!("connection refused")),
            }
        }
    }

    const FOO: &str = r#"
        <html><body>
            <a href="https://start.url/abc/one">One</a>
            <a href="/abc/two">Two</a>
            <a href="https://elsewhere.test/abc/three">Elsewhere</a>
            <a href="https://start.url/abc/seen">Seen</a>
        </body></html>
    "#;

    fn processor(dir: &std::path::Path, site: Arc<StubSite>) -> CrawlProcessor {
        CrawlProcessor::new(Scope::new("https://start.url"), PageStore::new(dir), site)
    }

    #[tokio::test]
    async fn test_process_returns_only_qualifying_links() {
        let dir = tempfile::tempdir().unwrap();
        let site = Arc::new(StubSite::default().with_page("https://start.url/abc/foo", FOO));
        let processor = processor(dir.path(), site);

        processor.visited().try_claim("https://start.url/abc/seen");
        processor.visited().mark_fetched("https://start.url/abc/seen");

        let links = processor.process("https://start.url/abc/foo").await.unwrap();

        assert_eq!(
            links,
            vec!["https://start.url/abc/one", "https://start.url/abc/two"]
        );
        assert!(dir.path().join("abc_foo.html").is_file());
        assert_eq!(processor.stats().summary().pages_saved, 1);
        assert_eq!(processor.stats().summary().links_discovered, 2);
    }

    #[tokio::test]
    async fn test_process_skips_visited_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let site = Arc::new(StubSite::default().with_page("https://start.url/abc/foo", FOO));
        let processor = processor(dir.path(), site.clone());

        processor.process("https://start.url/abc/foo").await.unwrap();
        let second = processor.process("https://start.url/abc/foo").await.unwrap();

        assert!(second.is_empty());
        assert_eq!(site.requests().len(), 1);
        assert_eq!(processor.stats().summary().links_skipped, 1);
    }

    #[tokio::test]
    async fn test_process_skips_pages_stored_by_a_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        PageStore::new(dir.path())
            .save("abc_foo", b"<html></html>")
            .await
            .unwrap();
        let site = Arc::new(StubSite::default().with_page("https://start.url/abc/foo", FOO));
        let processor = processor(dir.path(), site.clone());

        let links = processor.process("https://start.url/abc/foo").await.unwrap();

        assert!(links.is_empty());
        assert!(site.requests().is_empty());
    }

    #[tokio::test]
    async fn test_home_is_refetched_on_restart() {
        let dir = tempfile::tempdir().unwrap();
        PageStore::new(dir.path())
            .save("home", b"<html></html>")
            .await
            .unwrap();
        let site = Arc::new(StubSite::default().with_page(
            "https://start.url",
            r#"<a href="/docs">Docs</a>"#,
        ));
        let processor = processor(dir.path(), site);

        let links = processor.process("https://start.url").await.unwrap();

        assert_eq!(links, vec!["https://start.url/docs"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_still_saved() {
        let dir = tempfile::tempdir().unwrap();
        let site = Arc::new(StubSite::default().with_status_page(
            "https://start.url/missing",
            404,
            r#"<h1>Not Found</h1><a href="/abc/index">Back to docs</a>"#,
        ));
        let processor = processor(dir.path(), site);

        let links = processor.process("https://start.url/missing").await.unwrap();

        assert_eq!(links, vec!["https://start.url/abc/index"]);
        let saved = std::fs::read_to_string(dir.path().join("missing.html")).unwrap();
        assert!(saved.contains("Not Found"));
        assert!(processor.visited().is_visited("https://start.url/missing"));
        assert_eq!(processor.stats().summary().pages_saved, 1);
    }

    #[tokio::test]
    async fn test_fetch_error_is_reported_and_released() {
        let dir = tempfile::tempdir().unwrap();
        let site = Arc::new(StubSite::default());
        let processor = processor(dir.path(), site.clone());

        let err = processor
            .process("https://start.url/missing")
            .await
            .unwrap_err();

        assert_eq!(err.stage(), "fetch");
        assert_eq!(err.link(), "https://start.url/missing");
        assert!(!processor.visited().is_visited("https://start.url/missing"));

        // A later rediscovery gets another attempt.
        let _ = processor.process("https://start.url/missing").await;
        assert_eq!(site.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_persist_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the destination directory should be.
        let blocker = dir.path().join("saves");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let site = Arc::new(StubSite::default().with_page("https://start.url/abc/foo", FOO));
        let processor = CrawlProcessor::new(
            Scope::new("https://start.url"),
            PageStore::new(&blocker),
            site,
        );

        let err = processor
            .process("https://start.url/abc/foo")
            .await
            .unwrap_err();

        assert_eq!(err.stage(), "persist");
    }

    #[tokio::test]
    async fn test_duplicate_targets_on_one_page_are_returned_once() {
        let dir = tempfile::tempdir().unwrap();
        let site = Arc::new(StubSite::default().with_page(
            "https://start.url/a",
            r#"<a href="/b">B</a><a href="https://start.url/b">B again</a>"#,
        ));
        let processor = processor(dir.path(), site);

        let links = processor.process("https://start.url/a").await.unwrap();

        assert_eq!(links, vec!["https://start.url/b"]);
    }
}
