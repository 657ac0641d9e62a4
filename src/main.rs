// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging and parse command-line arguments
// 2. Build the crawler: fetcher, page store, processor, worker pool
// 3. Wire Ctrl+C / SIGTERM into a shutdown signal for the workers
// 4. Crawl until the site is exhausted or we are told to stop
// 5. Print a summary and exit (0 = crawl finished, 2 = error)
// =============================================================================

mod cli;
mod config;
mod crawl;
mod logging;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};

use cli::Cli;
use config::CrawlConfig;
use crawl::{CrawlProcessor, CrawlSummary, HttpFetcher, PageStore, Scope, WorkerPool};

#[tokio::main]
async fn main() {
    logging::init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = CrawlConfig::from_cli(&cli)?;

    let scope = Scope::new(config.base_url.clone());
    println!("🔍 Mirroring {} into {}", scope.base(), config.dest_dir.display());

    let fetcher = HttpFetcher::new(config.fetch_timeout)?;
    let processor = CrawlProcessor::new(
        scope,
        PageStore::new(config.dest_dir.clone()),
        Arc::new(fetcher),
    );
    let pool = WorkerPool::new(Arc::new(processor), config.workers);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested, waiting for workers to finish their current page");
        let _ = shutdown_tx.send(true);
    });

    let summary = pool.run(&config.base_url, shutdown_rx).await;

    print_summary(&summary, cli.json)?;
    Ok(0)
}

// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!();
    println!("📊 Summary:");
    println!("   💾 Saved: {}", summary.pages_saved);
    println!("   ⏭️  Skipped: {}", summary.links_skipped);
    println!("   ❌ Failed: {}", summary.links_failed);
    println!("   🔗 Discovered: {}", summary.links_discovered);
    Ok(())
}
