//! Specimen Gallery Core Library
//!
//! This library maintains a rotating supply of reference photographs for
//! named physical specimens by scraping an upstream photo-gallery site that
//! has no stable API. Successive calls for the same specimen surface
//! different photos: a persisted numeric cursor is advanced round-robin over
//! the specimen's available images.
//!
//! # Architecture
//!
//! - [`resolver`] - upstream identifier lookup with process-lifetime memoization
//! - [`pager`] - the two pagination strategies (gallery and photoscroll)
//! - [`download`] - streamed image fetch-and-store with per-URL fault isolation
//! - [`engine`] - the resolve → page-walk → slice → download → persist pipeline
//! - [`cursor`] - the cursor persistence contract and bundled stores

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cursor;
pub mod download;
pub mod engine;
pub mod pager;
pub mod resolver;
pub mod site;

pub(crate) mod http;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use cursor::{CursorStore, CursorStoreError, JsonCursorStore, MemoryCursorStore};
pub use download::{DownloadError, ImageStore, StoreOutcome, prune_oldest};
pub use engine::{HarvestError, Harvester, SyncReport};
pub use pager::{DEFAULT_BATCH_SIZE, GalleryPager, PageBatch, PagerError, PhotoscrollPager};
pub use resolver::{IdentifierResolver, ResolveError};
pub use site::SiteConfig;
