//! Session-stateful photoscroll pagination.
//!
//! The photoscroll view searches by free text and pages through results
//! with server-held session state: every request against the continuation
//! endpoint advances a hidden per-session page cursor by one. The requests
//! of one resolution call must therefore be issued strictly sequentially,
//! in order - reordering or parallelizing them makes the server hand back
//! the wrong page. This module models the sequence as an explicit
//! prime → advance×N → fetch pipeline over one cookie-carrying client.

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::http::build_session_client;
use crate::site::SiteConfig;

use super::parse::{continuation_candidates, scroll_candidates};
use super::{PageBatch, PagerError, slice_candidates};

/// Images on the first photoscroll page.
pub const SCROLL_FIRST_PAGE_SIZE: u64 = 50;

/// Images per continuation page after the first.
pub const SCROLL_CONTINUATION_SIZE: u64 = 15;

/// Pagination strategy for specimens without a known identifier.
///
/// Construct a fresh pager per resolution call: the underlying cookie
/// session is what the upstream site keys its scroll state on, and reusing
/// one across calls would resume from stale state.
#[derive(Debug)]
pub struct PhotoscrollPager {
    client: Client,
    site: SiteConfig,
}

impl PhotoscrollPager {
    /// Creates a pager owning a fresh cookie session against the given site.
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

    /// Fetches the batch at `cursor` for the free-text specimen `name`.
    ///
    /// Issues 1 request when `cursor < 50`, otherwise the full ordered
    /// continuation sequence, plus at most one end-of-content probe.
    ///
    /// # Errors
    ///
    /// Returns [`PagerError`] on network failure, an HTTP error status, or
    /// when the scroll container is missing from the first-page response.
    #[tracing::instrument(skip(self), fields(name = %name, cursor, batch_size))]
    pub async fn fetch(
        &self,
        name: &str,
        cursor: u64,
        batch_size: usize,
        force: bool,
    ) -> Result<PageBatch, PagerError> {
        // 50 images on the first page, 15 per continuation page after it.
        let pages = if cursor < SCROLL_FIRST_PAGE_SIZE {
            1
        } else {
            (cursor - SCROLL_FIRST_PAGE_SIZE) / SCROLL_CONTINUATION_SIZE + 2
        };

        let candidates = if pages == 1 {
            self.first_page(name).await?
        } else {
            // Strictly ordered: prime the session, advance it page by page,
            // then fetch. The server replays the wrong page otherwise.
            self.prime(name).await?;
            for _ in 0..pages - 2 {
                self.advance().await?;
            }
            match self.next_batch().await? {
                Some(candidates) => candidates,
                None => {
                    debug!(pages, "photoscroll session exhausted");
                    return Ok(PageBatch::exhausted());
                }
            }
        };

        if candidates.is_empty() {
            debug!("photoscroll returned no candidates");
            return Ok(PageBatch::exhausted());
        }

        let offset = if cursor < SCROLL_FIRST_PAGE_SIZE {
            usize::try_from(cursor).unwrap_or(usize::MAX)
        } else {
            usize::try_from((cursor - SCROLL_FIRST_PAGE_SIZE) % SCROLL_CONTINUATION_SIZE)
                .unwrap_or(0)
        };
        let (urls, _short) = slice_candidates(&candidates, offset, batch_size, force);
        let mut next_cursor = cursor + batch_size as u64;

        // Serving the page's last known URL means the caller reached the end
        // of currently loaded content; probe once to learn whether more
        // exists, and wrap the rotation if not.
        if !urls.is_empty() && urls.last() == candidates.last() && self.probe_exhausted().await? {
            debug!("photoscroll end of content; cursor wraps");
            next_cursor = 0;
        }

        debug!(
            pages,
            candidates = candidates.len(),
            served = urls.len(),
            next_cursor,
            "photoscroll batch resolved"
        );
        Ok(PageBatch { next_cursor, urls })
    }

    /// First-page search: one GET, candidates from the scroll container.
    async fn first_page(&self, name: &str) -> Result<Vec<String>, PagerError> {
        let url = self.site.photoscroll_search_url(name);
        let html = self.get_text(&url).await?;
        scroll_candidates(&html, self.site.base())
            .ok_or_else(|| PagerError::parse(url.as_str(), "photoscroll container not found"))
    }

    /// Priming request establishing the session's search context.
    async fn prime(&self, name: &str) -> Result<(), PagerError> {
        self.head(&self.site.photoscroll_search_url(name)).await
    }

    /// Advances the server-held page cursor by one.
    async fn advance(&self) -> Result<(), PagerError> {
        self.head(&self.site.photoscroll_continue_url()).await
    }

    /// Terminal fetch of the continuation sequence. `None` means the session
    /// ran past the last page (empty body).
    async fn next_batch(&self) -> Result<Option<Vec<String>>, PagerError> {
        let url = self.site.photoscroll_continue_url();
        let html = self.get_text(&url).await?;
        if html.is_empty() {
            return Ok(None);
        }
        Ok(Some(continuation_candidates(&html, self.site.base())))
    }

    /// Probes whether content exists beyond the current page.
    async fn probe_exhausted(&self) -> Result<bool, PagerError> {
        let url = self.site.photoscroll_continue_url();
        Ok(self.get_text(&url).await?.is_empty())
    }

    async fn head(&self, url: &Url) -> Result<(), PagerError> {
        let response = self
            .client
            .head(url.clone())
            .send()
            .await
            .map_err(|e| PagerError::network(url.as_str(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PagerError::http_status(url.as_str(), status.as_u16()));
        }
        Ok(())
    }

    async fn get_text(&self, url: &Url) -> Result<String, PagerError> {
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
        response
            .text()
            .await
            .map_err(|e| PagerError::network(url.as_str(), e))
    }
}
