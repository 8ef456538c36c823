//! CLI entry point: one resolution-and-download pass for one specimen.

use anyhow::Result;
use clap::Parser;
use specimen_gallery::{Harvester, JsonCursorStore, SiteConfig, prune_oldest};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let site = match &args.base_url {
        Some(base_url) => SiteConfig::new(base_url)?,
        None => SiteConfig::production(),
    };

    let store = JsonCursorStore::new(&args.cursor_file);
    let mut harvester =
        Harvester::new(site, store, &args.images_dir)?.with_batch_size(usize::from(args.count));
    if args.allow_partial {
        harvester = harvester.with_partial_batches();
    }

    info!(category = %args.category, item = %args.item, "fetching specimen images");
    let report = harvester.sync(&args.category, &args.item).await?;

    if report.failed > 0 {
        warn!(failed = report.failed, "some images failed to download");
    }

    if let Some(keep) = args.keep {
        let directory = args.images_dir.join(&args.category).join(&args.item);
        let removed = prune_oldest(&directory, keep).await?;
        if !removed.is_empty() {
            info!(pruned = removed.len(), "pruned aged images");
        }
    }

    info!(
        stored = report.stored.len(),
        failed = report.failed,
        next_cursor = report.next_cursor,
        "sync complete"
    );

    Ok(())
}
