//! Id-keyed gallery pagination.
//!
//! The gallery view is indexed by the specimen's numeric identifier and
//! serves fixed pages of 20 images. One resolution call costs exactly one
//! page request, which is why this strategy is preferred whenever an
//! identifier exists.

use reqwest::Client;
use tracing::debug;

use crate::http::build_session_client;
use crate::site::SiteConfig;

use super::parse::{NO_PHOTOS_SENTINEL, gallery_candidates, page_indicator};
use super::{PageBatch, PagerError, slice_candidates};

/// Images per server page on the gallery view.
pub const GALLERY_PAGE_SIZE: u64 = 20;

/// Pagination strategy for specimens with a known numeric identifier.
#[derive(Debug)]
pub struct GalleryPager {
    client: Client,
    site: SiteConfig,
}

impl GalleryPager {
    /// Creates a pager against the given site.
    ///
    /// # Errors
    ///
    /// Returns [`PagerError::Client`] when HTTP client construction fails.
    pub fn new(site: SiteConfig) -> Result<Self, PagerError> {
        Ok(Self {
            client: build_session_client().map_err(PagerError::client)?,
            site,
        })
    }

    /// Fetches the batch at `cursor` for the specimen with identifier `id`.
    ///
    /// Returns the URL slice and the cursor value to persist. An exhausted
    /// gallery (no photos, or a page past the end) yields
    /// [`PageBatch::exhausted`] so the rotation restarts.
    ///
    /// # Errors
    ///
    /// Returns [`PagerError`] on network failure, an HTTP error status, or
    /// when the page indicator marker is missing from an otherwise
    /// non-empty page.
    #[tracing::instrument(skip(self), fields(id, cursor, batch_size))]
    pub async fn fetch(
        &self,
        id: u64,
        cursor: u64,
        batch_size: usize,
        force: bool,
    ) -> Result<PageBatch, PagerError> {
        // 20 images per server page.
        let page = cursor / GALLERY_PAGE_SIZE + 1;
        let url = self.site.gallery_url(id, page);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PagerError::network(url.as_str(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PagerError::http_status(url.as_str(), status.as_u16()));
        }
        let html = response
            .text()
            .await
            .map_err(|e| PagerError::network(url.as_str(), e))?;

        if html.contains(NO_PHOTOS_SENTINEL) {
            debug!(id, "gallery has no photos");
            return Ok(PageBatch::exhausted());
        }

        let candidates = gallery_candidates(&html, self.site.base());
        let indicator = page_indicator(&html)
            .ok_or_else(|| PagerError::parse(url.as_str(), "page indicator not found"))?;

        if indicator.current > indicator.total {
            debug!(id, page, "gallery page past the end");
            return Ok(PageBatch::exhausted());
        }

        let offset = usize::try_from(cursor % GALLERY_PAGE_SIZE).unwrap_or(0);
        let (urls, short) = slice_candidates(&candidates, offset, batch_size, force);
        let mut next_cursor = cursor + batch_size as u64;

        let on_last_page = indicator.current >= indicator.total;
        if short && on_last_page {
            next_cursor = 0;
        }
        // Landing exactly on the boundary of the final page also wraps.
        if next_cursor % GALLERY_PAGE_SIZE == 0 && on_last_page {
            next_cursor = 0;
        }

        debug!(
            id,
            page,
            candidates = candidates.len(),
            served = urls.len(),
            next_cursor,
            "gallery batch resolved"
        );
        Ok(PageBatch { next_cursor, urls })
    }
}
