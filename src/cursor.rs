//! Cursor persistence contract and bundled stores.
//!
//! The core reads a specimen's cursor exactly once per resolution call and
//! writes the advanced value back exactly once, after the slice resolved
//! without a fatal error. Everything in between is the store owner's
//! business; embedders with an existing key-value store only need to
//! implement [`CursorStore`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;

/// Errors surfaced by cursor store implementations.
#[derive(Debug, Error)]
pub enum CursorStoreError {
    /// File system error reading or writing the backing store.
    #[error("IO error accessing cursor store {path}: {source}")]
    Io {
        /// The backing file where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The backing store exists but could not be decoded.
    #[error("corrupt cursor store {path}: {reason}")]
    Corrupt {
        /// The backing file that failed to decode.
        path: PathBuf,
        /// Decode failure detail.
        reason: String,
    },
}

impl CursorStoreError {
    /// Creates an IO error with the backing path as context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a corrupt-store error.
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Persisted per-specimen cursor: "index of the next photo to serve".
///
/// A missing key reads as 0. Implementations must be safe to share across
/// concurrently processed specimens.
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Returns the stored cursor for `key`, or 0 when none exists.
    ///
    /// # Errors
    ///
    /// Returns [`CursorStoreError`] when the backing store cannot be read.
    async fn get_cursor(&self, key: &str) -> Result<u64, CursorStoreError>;

    /// Writes the cursor for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CursorStoreError`] when the backing store cannot be written.
    async fn set_cursor(&self, key: &str, cursor: u64) -> Result<(), CursorStoreError>;
}

#[async_trait]
impl<T: CursorStore + ?Sized> CursorStore for Arc<T> {
    async fn get_cursor(&self, key: &str) -> Result<u64, CursorStoreError> {
        (**self).get_cursor(key).await
    }

    async fn set_cursor(&self, key: &str, cursor: u64) -> Result<(), CursorStoreError> {
        (**self).set_cursor(key, cursor).await
    }
}

/// In-memory cursor store for tests and embedders without persistence.
#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    cursors: Mutex<HashMap<String, u64>>,
}

impl MemoryCursorStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one cursor (test convenience).
    #[must_use]
    pub fn with_cursor(key: &str, cursor: u64) -> Self {
        let store = Self::new();
        store
            .cursors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), cursor);
        store
    }
}

// A poisoned lock still guards valid data; recover it instead of turning
// cursor persistence into a silent no-op.
#[async_trait]
impl CursorStore for MemoryCursorStore {
    async fn get_cursor(&self, key: &str) -> Result<u64, CursorStoreError> {
        Ok(self
            .cursors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(0))
    }

    async fn set_cursor(&self, key: &str, cursor: u64) -> Result<(), CursorStoreError> {
        self.cursors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), cursor);
        Ok(())
    }
}

/// File-backed cursor store: one JSON object mapping keys to cursors.
///
/// Durability matches the reference system's non-transactional store: the
/// file is rewritten in place on every `set_cursor`, and a crash leaves
/// either the old or the new map, both of which are safe restart points.
///
/// Every write is a load-modify-rewrite of the whole map, so accesses
/// serialize on an internal lock shared across clones; without it, two
/// concurrent writers for different keys would each rewrite the file from
/// their own snapshot and the slower one would drop the other's cursor.
/// Separate instances opened on the same path do not synchronize.
#[derive(Debug, Clone)]
pub struct JsonCursorStore {
    path: PathBuf,
    lock: Arc<AsyncMutex<()>>,
}

impl JsonCursorStore {
    /// Creates a store backed by `path`. The file is created lazily on the
    /// first write; a missing file reads as an empty map.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(AsyncMutex::new(())),
        }
    }

    async fn load(&self) -> Result<HashMap<String, u64>, CursorStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| CursorStoreError::corrupt(&self.path, e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(CursorStoreError::io(&self.path, e)),
        }
    }
}

#[async_trait]
impl CursorStore for JsonCursorStore {
    async fn get_cursor(&self, key: &str) -> Result<u64, CursorStoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.get(key).copied().unwrap_or(0))
    }

    async fn set_cursor(&self, key: &str, cursor: u64) -> Result<(), CursorStoreError> {
        let _guard = self.lock.lock().await;
        let mut cursors = self.load().await?;
        cursors.insert(key.to_string(), cursor);
        let bytes = serde_json::to_vec_pretty(&cursors)
            .map_err(|e| CursorStoreError::corrupt(&self.path, e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| CursorStoreError::io(&self.path, e))
    }
}
