//! Shared User-Agent string for all upstream HTTP clients.
//!
//! Single source for project URL and UA format so page, lookup and image
//! traffic stay consistent and easy to update (good citizenship; RFC 9308).

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/specimen-gallery";

/// Default User-Agent for all upstream requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("specimen-gallery/{version} (reference-image-tool; +{PROJECT_UA_URL})")
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ua_contains_version_and_project_url() {
        let ua = default_user_agent();
        assert!(
            ua.contains(PROJECT_UA_URL),
            "UA must contain project URL: {ua}"
        );
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("specimen-gallery/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must contain crate version"
        );
    }
}
