// src/crawl/error.rs
// Per-link failures. Each variant names the stage that failed and the link it
// failed on, so a single log line is enough to diagnose it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("failed to fetch {link}: {source:#}")]
    Fetch {
        link: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to save {link} to {}: {source}", path.display())]
    Persist {
        link: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract links from {link}: {reason}")]
    Extract { link: String, reason: String },
}

impl CrawlError {
    /// The pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            CrawlError::Fetch { .. } => "fetch",
            CrawlError::Persist { .. } => "persist",
            CrawlError::Extract { .. } => "extract",
        }
    }

    pub fn link(&self) -> &str {
        match self {
            CrawlError::Fetch { link, .. }
            | CrawlError::Persist { link, .. }
            | CrawlError::Extract { link, .. } => link,
        }
    }
}
