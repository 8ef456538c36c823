//! Shared HTTP client construction policy.
//!
//! Centralizes timeouts, user-agent and compression so lookup, page and
//! image traffic stay consistent. Three client flavors exist because the
//! upstream protocol demands them:
//!
//! - the lookup client must NOT follow redirects (the identifier lives in
//!   the `Location` header of the redirect response itself);
//! - the session client must carry cookies, because the photoscroll view
//!   tracks pagination state server-side per session;
//! - the image client is a plain streaming downloader.

use std::time::Duration;

use reqwest::Client;
use reqwest::redirect::Policy;

use crate::user_agent;

pub(crate) const CONNECT_TIMEOUT_SECS: u64 = 10;
pub(crate) const READ_TIMEOUT_SECS: u64 = 30;

/// Builds the redirect-suppressed client used for identifier lookups.
///
/// # Errors
///
/// Returns [`reqwest::Error`] when client construction fails.
pub(crate) fn build_lookup_client() -> Result<Client, reqwest::Error> {
    base_builder().redirect(Policy::none()).build()
}

/// Builds a cookie-carrying client backing one pagination session.
///
/// A fresh session client is created per resolution call so stale
/// server-side scroll state from a previous call can never leak in.
///
/// # Errors
///
/// Returns [`reqwest::Error`] when client construction fails.
pub(crate) fn build_session_client() -> Result<Client, reqwest::Error> {
    base_builder().cookie_store(true).build()
}

/// Builds the plain client used for streaming image downloads.
///
/// # Errors
///
/// Returns [`reqwest::Error`] when client construction fails.
pub(crate) fn build_image_client() -> Result<Client, reqwest::Error> {
    base_builder().build()
}

fn base_builder() -> reqwest::ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
}
