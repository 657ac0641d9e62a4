// src/crawl/fetch.rs
// =============================================================================
// This module downloads pages over HTTP.
//
// Key functionality:
// - One shared reqwest Client for the whole crawl (connection pooling)
// - A fixed per-request timeout
// - The status code is reported but never rejected: a 404 page is still a
//   page, and we mirror whatever the server sent
//
// The `Fetcher` trait is the seam between the crawler and the network. The
// real crawl uses `HttpFetcher`; tests plug in an in-memory site instead.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// What a fetch gives back: the HTTP status and the raw body bytes.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can download a link.
///
/// Only transport-level failures (DNS, connection, timeout, body read) are
/// errors.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, link: &str) -> Result<FetchedPage>;
}

/// Fetches pages with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    ///
    /// Redirects follow reqwest's default policy.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, link: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(link)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", link))?;

        let status = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", link))?;

        Ok(FetchedPage {
            status,
            body: body.to_vec(),
        })
    }
}
