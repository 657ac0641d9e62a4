// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The crawler only needs two things to run: where to start, and where to put
// the pages. Everything else has a sensible default.
// =============================================================================

use clap::Parser;

use crate::config::{DEFAULT_DEST_DIR, DEFAULT_URL, DEFAULT_WORKERS};

#[derive(Parser, Debug)]
#[command(
    name = "site-mirror",
    version = "0.1.0",
    about = "Mirror a website's pages to a local directory",
    long_about = "site-mirror crawls a website from a base URL, follows every link under that URL, \
                  and saves each page as an .html file. Pages already saved are skipped, so an \
                  interrupted crawl picks up where it left off."
)]
pub struct Cli {
    /// Base URL to start crawling from
    ///
    /// Only links under this URL (or root-relative links) are followed
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Destination directory where the pages should be saved
    #[arg(long, default_value = DEFAULT_DEST_DIR)]
    pub dir: String,

    /// Number of concurrent crawl workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Print the crawl summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
