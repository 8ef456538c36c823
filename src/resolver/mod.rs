//! Upstream identifier lookup with process-lifetime memoization.
//!
//! The site's search endpoint answers a `HEAD` request with a redirect whose
//! `Location` header encodes the specimen's numeric identifier when one
//! exists. A missing header or non-matching path is not an error: it simply
//! means the specimen has no stable id and the photoscroll strategy must be
//! used instead.
//!
//! Results are memoized per name for the life of the process. Concurrent
//! first lookups for the same name may race and issue duplicate requests;
//! the result is idempotent, so the table tolerates duplicate writes rather
//! than taking a lock around the network call.

mod overrides;

pub(crate) use overrides::curated_urls;

use std::sync::LazyLock;

use dashmap::DashMap;
use regex::Regex;
use reqwest::Client;
use reqwest::header::LOCATION;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::http::build_lookup_client;
use crate::site::SiteConfig;

// extract specimen id from /id-##.html
static SPECIMEN_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/id-(\d+)\.html")
        .unwrap_or_else(|e| panic!("invalid static specimen id regex: {e}"))
});

/// Errors surfaced by identifier lookups.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// HTTP client construction failed.
    #[error("failed to construct lookup HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Network-level failure issuing the lookup request.
    #[error("network error looking up {name}: {source}")]
    Network {
        /// The specimen name being looked up.
        name: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },
}

/// Redirect-location identifier lookup, memoized per specimen name.
pub struct IdentifierResolver {
    client: Client,
    site: SiteConfig,
    cache: DashMap<String, Option<u64>>,
}

impl std::fmt::Debug for IdentifierResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierResolver")
            .field("site", &self.site)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl IdentifierResolver {
    /// Creates a resolver against the given site.
    ///
    /// The internal client suppresses redirects: following them would
    /// consume the very `Location` header the lookup exists to read.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Client`] when HTTP client construction fails.
    pub fn new(site: SiteConfig) -> Result<Self, ResolveError> {
        Ok(Self {
            client: build_lookup_client().map_err(|source| ResolveError::Client { source })?,
            site,
            cache: DashMap::new(),
        })
    }

    /// Returns the site's numeric identifier for `name`, or `None` when the
    /// site has no stable id for it (which selects the photoscroll strategy).
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Network`] when the lookup request fails.
    #[tracing::instrument(skip(self), fields(name = %name))]
    pub async fn resolve(&self, name: &str) -> Result<Option<u64>, ResolveError> {
        if let Some(cached) = self.cache.get(name) {
            debug!(id = ?*cached, "identifier cache hit");
            return Ok(*cached);
        }

        let response = self
            .client
            .head(self.site.search_url(name))
            .send()
            .await
            .map_err(|source| ResolveError::Network {
                name: name.to_string(),
                source,
            })?;

        let id = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_identifier);

        debug!(id = ?id, "identifier resolved");
        // Duplicate concurrent inserts write the same value; last writer wins.
        self.cache.insert(name.to_string(), id);
        Ok(id)
    }
}

/// Extracts the numeric identifier from a redirect `Location` value.
///
/// Accepts both relative (`/id-123.html`) and absolute
/// (`https://host/id-123.html`) forms; the pattern is anchored to the path
/// start so unrelated pages carrying an id-like fragment do not match.
fn extract_identifier(location: &str) -> Option<u64> {
    let path_owned;
    let path = if location.starts_with("http://") || location.starts_with("https://") {
        path_owned = Url::parse(location).ok()?.path().to_string();
        &path_owned
    } else {
        location
    };
    SPECIMEN_ID_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
