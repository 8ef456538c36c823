//! Upstream site configuration and endpoint construction.
//!
//! The scraped site exposes exactly three endpoints the crate cares about:
//! an identifier search, an id-keyed gallery view, and a session-stateful
//! photoscroll view. All of them hang off one base URL, which is injectable
//! so tests can point the whole pipeline at a mock server.

use url::Url;

/// Production base URL of the scraped gallery site.
pub const DEFAULT_BASE_URL: &str = "https://www.mindat.org";

/// Base URL plus endpoint builders for the scraped site.
///
/// Cloning is cheap enough to hand each pager its own copy; the config is
/// immutable after construction.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    base: Url,
}

impl SiteConfig {
    /// Creates a config for the production site.
    ///
    /// # Panics
    ///
    /// Never panics in practice: the default base URL is a valid constant.
    #[must_use]
    #[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
    pub fn production() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).unwrap(),
        }
    }

    /// Creates a config with a custom base URL (tests, mirrors).
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base_url.trim_end_matches('/'))?;
        Ok(Self { base })
    }

    /// The configured base URL, used to absolutize scraped image paths.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Identifier lookup endpoint; the id arrives in the redirect `Location`.
    #[must_use]
    pub fn search_url(&self, name: &str) -> Url {
        self.endpoint("search.php", &[("name", name)])
    }

    /// Id-keyed gallery page, 20 images per server page.
    #[must_use]
    pub fn gallery_url(&self, id: u64, page: u64) -> Url {
        self.endpoint(
            "gallery.php",
            &[("min", &id.to_string()), ("page", &page.to_string())],
        )
    }

    /// Free-text photoscroll search page (first page of a scroll session).
    #[must_use]
    pub fn photoscroll_search_url(&self, name: &str) -> Url {
        self.endpoint("photoscroll.php", &[("searchbox", name)])
    }

    /// Session continuation endpoint; each request advances server-held
    /// pagination state by one page.
    #[must_use]
    pub fn photoscroll_continue_url(&self) -> Url {
        self.endpoint("photoscroll.php", &[("id", "1")])
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::production()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_production_base_url_parses() {
        let site = SiteConfig::production();
        assert_eq!(site.base().as_str(), "https://www.mindat.org/");
    }

    #[test]
    fn test_search_url_encodes_name() {
        let site = SiteConfig::new("http://127.0.0.1:8080").unwrap();
        let url = site.search_url("satin spar");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/search.php?name=satin+spar"
        );
    }

    #[test]
    fn test_gallery_url_carries_id_and_page() {
        let site = SiteConfig::new("http://127.0.0.1:8080/").unwrap();
        let url = site.gallery_url(1720, 2);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/gallery.php?min=1720&page=2"
        );
    }

    #[test]
    fn test_photoscroll_urls() {
        let site = SiteConfig::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            site.photoscroll_search_url("quartz").as_str(),
            "http://127.0.0.1:8080/photoscroll.php?searchbox=quartz"
        );
        assert_eq!(
            site.photoscroll_continue_url().as_str(),
            "http://127.0.0.1:8080/photoscroll.php?id=1"
        );
    }

    #[test]
    fn test_relative_base_rejected() {
        assert!(SiteConfig::new("not a url").is_err());
    }
}
