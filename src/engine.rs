//! The resolution-and-download pipeline.
//!
//! One [`Harvester::sync`] call is one sequential unit of work for one
//! specimen: read the persisted cursor, pick a pagination strategy, resolve
//! the URL slice and next cursor, download the slice, persist the cursor.
//! Pagination failures abort the call before the cursor write; download
//! failures are isolated per URL and cannot veto it. Independent specimens
//! may be synced concurrently - the only shared mutable state is the
//! resolver's memo table, which tolerates duplicate writes.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::cursor::{CursorStore, CursorStoreError};
use crate::download::{DownloadError, ImageStore, StoreOutcome};
use crate::pager::{DEFAULT_BATCH_SIZE, GalleryPager, PageBatch, PagerError, PhotoscrollPager};
use crate::resolver::{IdentifierResolver, ResolveError, curated_urls};
use crate::site::SiteConfig;

/// Errors surfaced by a full resolution-and-download call.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Identifier lookup failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Pagination failed; the cursor was not advanced.
    #[error(transparent)]
    Pager(#[from] PagerError),

    /// Destination directory could not be provisioned.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Cursor store read or write failed.
    #[error(transparent)]
    Cursor(#[from] CursorStoreError),
}

/// Outcome summary of one sync call.
#[derive(Debug)]
pub struct SyncReport {
    /// Cursor value persisted for the next call.
    pub next_cursor: u64,
    /// Paths of images stored by this call.
    pub stored: Vec<PathBuf>,
    /// Number of URLs whose download failed (isolated, logged).
    pub failed: usize,
}

/// Rotating image harvester for named specimens.
pub struct Harvester<S> {
    site: SiteConfig,
    store: S,
    resolver: IdentifierResolver,
    images: ImageStore,
    images_root: PathBuf,
    batch_size: usize,
    force: bool,
}

impl<S> std::fmt::Debug for Harvester<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harvester")
            .field("site", &self.site)
            .field("images_root", &self.images_root)
            .field("batch_size", &self.batch_size)
            .field("force", &self.force)
            .finish_non_exhaustive()
    }
}

impl<S: CursorStore> Harvester<S> {
    /// Creates a harvester writing under `images_root` and persisting
    /// cursors in `store`. Batch size defaults to
    /// [`DEFAULT_BATCH_SIZE`] with short-batch padding enabled.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError`] when HTTP client construction fails.
    pub fn new(
        site: SiteConfig,
        store: S,
        images_root: impl Into<PathBuf>,
    ) -> Result<Self, HarvestError> {
        Ok(Self {
            resolver: IdentifierResolver::new(site.clone())?,
            images: ImageStore::new()?,
            site,
            store,
            images_root: images_root.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            force: true,
        })
    }

    /// Sets how many images one sync call fetches.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Disables padding of a short final page; short batches are returned
    /// as-is instead of repeating trailing items.
    #[must_use]
    pub fn with_partial_batches(mut self) -> Self {
        self.force = false;
        self
    }

    /// Runs one resolution-and-download pass for a specimen.
    ///
    /// The cursor is persisted only after the slice resolved without a
    /// fatal error; a failure anywhere before that leaves the stored value
    /// untouched, so retrying with the same cursor is always safe.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError`] on lookup, pagination or cursor-store
    /// failure, and when the destination directory cannot be provisioned.
    /// Individual image download failures are reported in the
    /// [`SyncReport`], not as errors.
    #[tracing::instrument(skip(self), fields(category = %category, item = %item))]
    pub async fn sync(&self, category: &str, item: &str) -> Result<SyncReport, HarvestError> {
        let key = cursor_key(category, item);
        let cursor = self.store.get_cursor(&key).await?;
        let directory = self.images_root.join(category).join(item);

        if directory_is_populated(&directory).await {
            debug!(dir = %directory.display(), "images already present; extending rotation");
        }

        let batch = self.resolve_batch(item, cursor).await?;
        info!(
            cursor,
            next_cursor = batch.next_cursor,
            urls = batch.urls.len(),
            "batch resolved"
        );

        let outcomes = self.images.store(&batch.urls, &directory).await?;
        self.store.set_cursor(&key, batch.next_cursor).await?;

        Ok(build_report(batch.next_cursor, outcomes))
    }

    /// Picks the pagination strategy and resolves the URL slice at `cursor`
    /// without downloading anything or touching the cursor store.
    ///
    /// Specimens with a known identifier use the gallery; a curated
    /// override short-circuits pagination entirely; everything else walks
    /// the photoscroll over a fresh session. [`sync`](Self::sync) runs this
    /// and then downloads the slice; call it directly for a dry run.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError`] on lookup or pagination failure.
    pub async fn resolve_batch(&self, item: &str, cursor: u64) -> Result<PageBatch, HarvestError> {
        match self.resolver.resolve(item).await? {
            Some(id) => {
                if let Some(urls) = curated_urls(id) {
                    debug!(id, "serving curated override list");
                    return Ok(PageBatch {
                        next_cursor: 0,
                        urls: urls.iter().map(|&url| url.to_string()).collect(),
                    });
                }
                let pager = GalleryPager::new(self.site.clone())?;
                Ok(pager.fetch(id, cursor, self.batch_size, self.force).await?)
            }
            None => {
                // Fresh pager per call: the photoscroll session must start
                // from clean server-side state.
                let pager = PhotoscrollPager::new(self.site.clone())?;
                Ok(pager
                    .fetch(item, cursor, self.batch_size, self.force)
                    .await?)
            }
        }
    }
}

fn cursor_key(category: &str, item: &str) -> String {
    format!("{category}/{item}")
}

async fn directory_is_populated(directory: &Path) -> bool {
    match tokio::fs::read_dir(directory).await {
        Ok(mut entries) => matches!(entries.next_entry().await, Ok(Some(_))),
        Err(_) => false,
    }
}

fn build_report(next_cursor: u64, outcomes: Vec<StoreOutcome>) -> SyncReport {
    let mut stored = Vec::new();
    let mut failed = 0;
    for outcome in outcomes {
        match outcome.result {
            Ok(path) => stored.push(path),
            Err(_) => failed += 1,
        }
    }
    SyncReport {
        next_cursor,
        stored,
        failed,
    }
}
