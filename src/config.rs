// src/config.rs
// Runtime settings for one crawl, built from the command line.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::cli::Cli;

pub const DEFAULT_URL: &str = "https://go.dev";
pub const DEFAULT_DEST_DIR: &str = "data/saves";
pub const DEFAULT_WORKERS: usize = 10;
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: String,
    pub dest_dir: PathBuf,
    pub workers: usize,
    pub fetch_timeout: Duration,
}

impl CrawlConfig {
    pub fn new(base_url: impl Into<String>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            dest_dir: dest_dir.into(),
            workers: DEFAULT_WORKERS,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Self::new(cli.url.clone(), cli.dir.clone()).with_workers(cli.workers);
        config.validate()?;
        Ok(config)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Rejects settings the crawl cannot run with.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid URL '{}'", self.base_url))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            bail!("Base URL must be http or https, got '{}'", url.scheme());
        }
        if self.workers == 0 {
            bail!("At least one worker is required");
        }
        if self.dest_dir.as_os_str().is_empty() {
            bail!("Destination directory must not be empty");
        }
        Ok(())
    }
}
