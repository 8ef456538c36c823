//! Streamed fetch-and-store for resolved image URLs.
//!
//! Bodies are streamed to disk in chunks so memory use stays bounded no
//! matter how large an image is. File names continue a zero-padded numeric
//! sequence per directory, so lexical order equals insertion order across
//! repeated calls and pruning-by-age can sort by name.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use crate::http::build_image_client;

use super::error::DownloadError;

/// Maps a declared content type to a file extension.
///
/// Exactly the two expected image formats are accepted; anything else is an
/// unsupported-format failure for that single URL.
fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        _ => None,
    }
}

/// Result of one attempted image store.
#[derive(Debug)]
pub struct StoreOutcome {
    /// The image URL that was attempted.
    pub url: String,
    /// The stored path, or the isolated failure.
    pub result: Result<PathBuf, DownloadError>,
}

impl StoreOutcome {
    /// True when the image landed on disk.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        self.result.is_ok()
    }
}

/// Downloads resolved URL slices into specimen directories.
#[derive(Debug, Clone)]
pub struct ImageStore {
    client: Client,
}

impl ImageStore {
    /// Creates a store with the shared download client policy.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] when HTTP client construction fails.
    pub fn new() -> Result<Self, DownloadError> {
        Ok(Self {
            client: build_image_client().map_err(DownloadError::client)?,
        })
    }

    /// Stores each URL under `directory`, one file per URL.
    ///
    /// Failures are isolated per URL: a failed fetch or write is logged,
    /// reported in that URL's outcome, and does not abort the remaining
    /// URLs. The numeric stem only advances on success, so the sequence on
    /// disk stays gapless.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Io`] only when the destination directory
    /// cannot be provisioned or scanned; per-URL failures never surface
    /// here.
    #[tracing::instrument(skip(self, urls), fields(count = urls.len(), dir = %directory.display()))]
    pub async fn store(
        &self,
        urls: &[String],
        directory: &Path,
    ) -> Result<Vec<StoreOutcome>, DownloadError> {
        tokio::fs::create_dir_all(directory)
            .await
            .map_err(|e| DownloadError::io(directory, e))?;

        let mut stem = next_stem_index(directory).await?;
        let mut outcomes = Vec::with_capacity(urls.len());

        for url in urls {
            let result = self.fetch_one(url, directory, stem).await;
            match &result {
                Ok(path) => {
                    debug!(url = %url, path = %path.display(), "image stored");
                    stem += 1;
                }
                Err(error) => {
                    warn!(url = %url, error = %error, "image download failed; skipping");
                }
            }
            outcomes.push(StoreOutcome {
                url: url.clone(),
                result,
            });
        }

        Ok(outcomes)
    }

    /// Fetches one URL and streams its body to the next file in sequence.
    async fn fetch_one(
        &self,
        url: &str,
        directory: &Path,
        stem: u64,
    ) -> Result<PathBuf, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        let Some(extension) = extension_for_content_type(&content_type) else {
            return Err(DownloadError::unsupported_content_type(url, content_type));
        };

        let path = directory.join(format!("{stem:06}.{extension}"));
        let file = File::create(&path)
            .await
            .map_err(|e| DownloadError::io(&path, e))?;

        match stream_to_file(file, response, url, &path).await {
            Ok(()) => Ok(path),
            Err(error) => {
                // Partial file must not pollute the ordered sequence.
                let _ = tokio::fs::remove_file(&path).await;
                Err(error)
            }
        }
    }
}

/// Streams a response body to file in chunks.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<(), DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))
}

/// Returns the next numeric stem for `directory`: one past the highest
/// existing stem, or 0 for a fresh directory. Non-numeric names are
/// ignored.
async fn next_stem_index(directory: &Path) -> Result<u64, DownloadError> {
    let mut entries = tokio::fs::read_dir(directory)
        .await
        .map_err(|e| DownloadError::io(directory, e))?;

    let mut highest: Option<u64> = None;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DownloadError::io(directory, e))?
    {
        let stem = entry
            .path()
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u64>().ok());
        if let Some(stem) = stem {
            highest = Some(highest.map_or(stem, |h| h.max(stem)));
        }
    }

    Ok(highest.map_or(0, |h| h + 1))
}

/// Removes the oldest files in `directory` beyond a retention count,
/// sorted by filename ascending (the store's naming makes that age order).
///
/// Returns the removed paths. A missing directory is treated as already
/// empty.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] when the directory cannot be scanned or a
/// file cannot be removed.
pub async fn prune_oldest(directory: &Path, keep: usize) -> Result<Vec<PathBuf>, DownloadError> {
    let mut entries = match tokio::fs::read_dir(directory).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DownloadError::io(directory, e)),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DownloadError::io(directory, e))?
    {
        if entry
            .file_type()
            .await
            .map_err(|e| DownloadError::io(entry.path(), e))?
            .is_file()
        {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let excess = paths.len().saturating_sub(keep);
    let mut removed = Vec::with_capacity(excess);
    for path in paths.into_iter().take(excess) {
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| DownloadError::io(&path, e))?;
        debug!(path = %path.display(), "pruned aged image");
        removed.push(path);
    }
    Ok(removed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_content_type_supported_formats() {
        assert_eq!(extension_for_content_type("image/png"), Some("png"));
        assert_eq!(extension_for_content_type("image/jpeg"), Some("jpg"));
        assert_eq!(
            extension_for_content_type("image/jpeg; charset=binary"),
            Some("jpg")
        );
        assert_eq!(extension_for_content_type("IMAGE/PNG"), Some("png"));
    }

    #[test]
    fn test_extension_for_content_type_rejects_everything_else() {
        assert_eq!(extension_for_content_type("text/html"), None);
        assert_eq!(extension_for_content_type("image/gif"), None);
        assert_eq!(extension_for_content_type(""), None);
    }

    #[tokio::test]
    async fn test_next_stem_index_fresh_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(next_stem_index(dir.path()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_next_stem_index_continues_sequence() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("000000.jpg"), b"x")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("000004.png"), b"x")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), b"x")
            .await
            .unwrap();
        assert_eq!(next_stem_index(dir.path()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_prune_oldest_keeps_newest_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for stem in 0..4u64 {
            tokio::fs::write(dir.path().join(format!("{stem:06}.jpg")), b"x")
                .await
                .unwrap();
        }

        let removed = prune_oldest(dir.path(), 2).await.unwrap();
        assert_eq!(
            removed,
            vec![
                dir.path().join("000000.jpg"),
                dir.path().join("000001.jpg")
            ]
        );
        assert!(dir.path().join("000002.jpg").exists());
        assert!(dir.path().join("000003.jpg").exists());
    }

    #[tokio::test]
    async fn test_prune_oldest_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let removed = prune_oldest(&dir.path().join("absent"), 2).await.unwrap();
        assert!(removed.is_empty());
    }

    #[tokio::test]
    async fn test_prune_oldest_under_retention_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("000000.jpg"), b"x")
            .await
            .unwrap();
        let removed = prune_oldest(dir.path(), 5).await.unwrap();
        assert!(removed.is_empty());
        assert!(dir.path().join("000000.jpg").exists());
    }
}
