//! Streamed image fetch-and-store with per-URL fault isolation.

mod error;
mod store;

pub use error::DownloadError;
pub use store::{ImageStore, StoreOutcome, prune_oldest};
