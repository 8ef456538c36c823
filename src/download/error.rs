//! Error types for image downloads.
//!
//! Download errors are isolated per URL: one failing image is logged and
//! skipped without aborting the rest of the batch or the cursor write.
//! Only directory provisioning failures abort a whole store call.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur storing a single image (or provisioning the
/// destination directory).
#[derive(Debug, Error)]
pub enum DownloadError {
    /// HTTP client construction failed.
    #[error("failed to construct download HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Network-level error (DNS resolution, connection refused, timeout, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response declared a content type outside the two supported
    /// image formats.
    #[error("unsupported content type '{content_type}' for {url}")]
    UnsupportedContentType {
        /// The URL whose response was rejected.
        url: String,
        /// The declared content type.
        content_type: String,
    },

    /// File system error during download (create dir, create file, write).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates a client construction error.
    pub fn client(source: reqwest::Error) -> Self {
        Self::Client { source }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an unsupported content type error.
    pub fn unsupported_content_type(
        url: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self::UnsupportedContentType {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates an IO error with the file path as context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let error = DownloadError::http_status("https://img.test/1.jpg", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(msg.contains("https://img.test/1.jpg"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_unsupported_content_type_display() {
        let error = DownloadError::unsupported_content_type("https://img.test/1", "text/html");
        let msg = error.to_string();
        assert!(msg.contains("text/html"), "Expected content type in: {msg}");
    }

    #[test]
    fn test_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::io(PathBuf::from("/tmp/000001.jpg"), io_error);
        assert!(error.to_string().contains("/tmp/000001.jpg"));
    }
}
