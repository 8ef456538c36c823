//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use specimen_gallery::DEFAULT_BATCH_SIZE;

/// Fetch a rotating batch of reference images for a named specimen.
///
/// Each run advances the specimen's persisted cursor so that successive
/// runs surface different photos, round-robin over the upstream gallery.
#[derive(Parser, Debug)]
#[command(name = "specimen-gallery")]
#[command(author, version, about)]
pub struct Args {
    /// Specimen category (becomes the parent directory, e.g. "silicates")
    pub category: String,

    /// Specimen name as searched on the upstream site (e.g. "quartz")
    pub item: String,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Images to fetch per run (1-15; the continuation page caps at 15)
    #[arg(short = 'n', long, default_value_t = DEFAULT_BATCH_SIZE as u8, value_parser = clap::value_parser!(u8).range(1..=15))]
    pub count: u8,

    /// Return a short batch as-is instead of padding it from the page tail
    #[arg(long)]
    pub allow_partial: bool,

    /// Root directory for stored images ({root}/{category}/{item}/)
    #[arg(long, default_value = "images")]
    pub images_dir: PathBuf,

    /// JSON file persisting per-specimen cursors
    #[arg(long, default_value = "cursors.json")]
    pub cursor_file: PathBuf,

    /// Override the upstream base URL (mirrors, testing)
    #[arg(long)]
    pub base_url: Option<String>,

    /// After fetching, prune the specimen directory down to this many files
    #[arg(long)]
    pub keep: Option<usize>,
}
