//! HTML extraction for the two scraped page layouts.
//!
//! The crate deliberately depends on a handful of fixed markers in the
//! upstream markup (an image marker class, a page-count marker class, a
//! scroll container id, and a "no photos" sentinel string) and makes no
//! attempt to adapt beyond them. Anything else changing upstream surfaces
//! as a parse failure.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Sentinel string the gallery page renders when a specimen has no photos.
pub(crate) const NO_PHOTOS_SENTINEL: &str = "No photos found";

// extract page numbers
static PAGE_INDICATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Page (\d+) of (\d+)")
        .unwrap_or_else(|e| panic!("invalid static page indicator regex: {e}"))
});

/// "Page `current` of `total`" as rendered on a gallery page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageIndicator {
    pub current: u64,
    pub total: u64,
}

/// Compiles a known-good static selector; panics on an invalid pattern.
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector '{css}': {e:?}"))
}

/// Extracts gallery candidate URLs: the first `<img src>` inside each
/// element carrying the `userbigpicture` marker class, in document order.
pub(crate) fn gallery_candidates(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let marker = selector(".userbigpicture");
    let img = selector("img");
    document
        .select(&marker)
        .filter_map(|element| element.select(&img).next())
        .filter_map(|element| image_src(element, base))
        .collect()
}

/// Extracts the "Page N of M" indicator from a gallery page, if present.
pub(crate) fn page_indicator(html: &str) -> Option<PageIndicator> {
    let document = Html::parse_document(html);
    let marker = selector(".pnpagecount");
    let text: String = document.select(&marker).next()?.text().collect();
    let caps = PAGE_INDICATOR_RE.captures(&text)?;
    Some(PageIndicator {
        current: caps.get(1)?.as_str().parse().ok()?,
        total: caps.get(2)?.as_str().parse().ok()?,
    })
}

/// Extracts candidate URLs from the photoscroll container on a first-page
/// search response. Returns `None` when the container itself is absent
/// (a parse failure, distinct from a present-but-empty container).
pub(crate) fn scroll_candidates(html: &str, base: &Url) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let container = selector("#photoscroll");
    let img = selector("img");
    let root = document.select(&container).next()?;
    Some(
        root.select(&img)
            .filter_map(|element| image_src(element, base))
            .collect(),
    )
}

/// Extracts every `<img src>` in a continuation response body.
///
/// Continuation pages are bare fragments without the container wrapper, so
/// every image in the body belongs to the scroll.
pub(crate) fn continuation_candidates(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let img = selector("img");
    document
        .select(&img)
        .filter_map(|element| image_src(element, base))
        .collect()
}

fn image_src(element: ElementRef<'_>, base: &Url) -> Option<String> {
    element
        .value()
        .attr("src")
        .and_then(|src| absolutize(src, base))
}

/// Resolves a possibly relative `src` against the site base URL.
///
/// Returns the value as-is if it already starts with `http://` or
/// `https://`; normalizes `//...` to `https:...`; otherwise joins with
/// `base`.
pub(crate) fn absolutize(src: &str, base: &Url) -> Option<String> {
    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }
    if src.starts_with("//") {
        return Some(format!("https:{src}"));
    }
    base.join(src).ok().map(|url| url.to_string())
}
