//! Hand-curated URL lists for identifiers whose upstream gallery is broken.
//!
//! A hit here bypasses pagination entirely: the fixed list is served as the
//! whole batch and the cursor resets to 0. Entries are maintained by hand
//! when a specimen's gallery layout is known to be unusable upstream.

struct OverrideEntry {
    id: u64,
    urls: &'static [&'static str],
}

// 8573: the upstream gallery for this specimen mixes unrelated material,
// so a fixed set of known-good images is served instead.
const OVERRIDES: &[OverrideEntry] = &[OverrideEntry {
    id: 8573,
    urls: &[
        "https://www.minerals.net/MineralImages/gypsum7.jpg",
        "https://www.minerals.net/MineralImages/gypsum-satin-spar-france.jpg",
    ],
}];

/// Returns the curated URL list for `id`, if one is maintained.
pub(crate) fn curated_urls(id: u64) -> Option<&'static [&'static str]> {
    OVERRIDES
        .iter()
        .find(|entry| entry.id == id)
        .map(|entry| entry.urls)
}
