//! Pagination strategies for the upstream gallery site.
//!
//! The site exposes two incompatible pagination surfaces and a specimen
//! lands on exactly one of them:
//!
//! - [`GalleryPager`] - numeric-id-indexed gallery, 20 items per server
//!   page, one request per resolution call;
//! - [`PhotoscrollPager`] - free-text, session-stateful scroll view, 50
//!   items on the first page and 15 per continuation, driven by strictly
//!   ordered requests.
//!
//! Both strategies share one slice arithmetic: given the full candidate
//! list for the current page context, cut `batch_size` URLs starting at the
//! cursor's in-page offset, optionally padding a short final slice from the
//! page tail.

mod error;
pub(crate) mod parse;

mod gallery;
mod photoscroll;

pub use error::PagerError;
pub use gallery::{GALLERY_PAGE_SIZE, GalleryPager};
pub use photoscroll::{PhotoscrollPager, SCROLL_CONTINUATION_SIZE, SCROLL_FIRST_PAGE_SIZE};

/// Default number of images one resolution call returns.
///
/// Only tested with 5; the photoscroll continuation page caps at 15.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Result of one pagination fetch: the URL slice to download and the cursor
/// value the caller should persist once the call completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBatch {
    /// Cursor to persist; 0 means the rotation wrapped around.
    pub next_cursor: u64,
    /// Image URLs to download, at most the requested batch size.
    pub urls: Vec<String>,
}

impl PageBatch {
    /// Batch signalling an exhausted strategy: nothing to serve, cursor
    /// reset so the next call restarts from the beginning.
    #[must_use]
    pub fn exhausted() -> Self {
        Self {
            next_cursor: 0,
            urls: Vec::new(),
        }
    }
}

/// Cuts the requested slice out of a page's candidate list.
///
/// Returns the slice plus a flag telling whether the unpadded slice came up
/// shorter than `batch_size`. When it does and `force` is set, the slice is
/// replaced with the last `batch_size` candidates of the page; this may
/// re-serve URLs already returned by a previous call. That overlap is
/// deliberate and not deduplicated - callers depending on a full batch get
/// one even if it repeats content.
pub(crate) fn slice_candidates(
    candidates: &[String],
    offset: usize,
    batch_size: usize,
    force: bool,
) -> (Vec<String>, bool) {
    let end = offset.saturating_add(batch_size).min(candidates.len());
    let slice: Vec<String> = if offset >= candidates.len() {
        Vec::new()
    } else {
        candidates[offset..end].to_vec()
    };

    let short = slice.len() < batch_size;
    if short && force {
        let start = candidates.len().saturating_sub(batch_size);
        return (candidates[start..].to_vec(), short);
    }
    (slice, short)
}
