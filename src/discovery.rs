//! Link Discovery: candidate article links on an arbitrary listing page.
//!
//! Selector patterns are tried in a fixed order and matches are kept in
//! the order found; there is no relevance scoring. Collection stops at
//! `raw_link_cap` candidates and the result is trimmed to `max_links`.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::{LinkDedup, Settings};
use crate::models::LinkCandidate;
use crate::utils::element_text;

/// Ordered listing-page link patterns.
pub const LINK_PATTERNS: [&str; 8] = [
    r#"a[href*="/article"]"#,
    r#"a[href*="/news"]"#,
    r#"a[href*="/story"]"#,
    r#"a[href*="/20"]"#,
    "article a[href]",
    "h2 a[href]",
    "h3 a[href]",
    r#"[class*="headline"] a[href]"#,
];

/// Substrings that disqualify an href outright.
const REJECTED_HREF_PARTS: [&str; 2] = ["tag", "mailto"];

static LINK_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    LINK_PATTERNS
        .iter()
        .filter_map(|pattern| match Selector::parse(pattern) {
            Ok(selector) => Some(selector),
            Err(e) => {
                error!(%pattern, error = %e, "Skipping unparseable link pattern");
                None
            }
        })
        .collect()
});

/// Find candidate article links on a listing page.
///
/// Relative hrefs are resolved against `base`. An anchor qualifies when its
/// text is longer than `min_anchor_chars` characters and its href contains
/// neither `tag` nor `mailto`.
#[instrument(level = "debug", skip_all, fields(base = %base))]
pub fn discover(document: &Html, base: &Url, settings: &Settings) -> Vec<LinkCandidate> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut candidates = Vec::new();

    'patterns: for selector in LINK_SELECTORS.iter() {
        for element in document.select(selector) {
            if candidates.len() >= settings.raw_link_cap {
                break 'patterns;
            }
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if REJECTED_HREF_PARTS.iter().any(|part| href.contains(part)) {
                continue;
            }
            let text = element_text(&element);
            if text.chars().count() <= settings.min_anchor_chars {
                continue;
            }
            let Ok(resolved) = base.join(href.trim()) else {
                continue;
            };
            if !matches!(resolved.scheme(), "http" | "https") {
                continue;
            }

            let url = resolved.to_string();
            let key = match settings.link_dedup {
                LinkDedup::Pair => (url.clone(), text.clone()),
                LinkDedup::Url => (url.clone(), String::new()),
            };
            if seen.insert(key) {
                candidates.push(LinkCandidate { url, text });
            }
        }
    }

    candidates.truncate(settings.max_links);
    debug!(count = candidates.len(), "Discovered candidate links");
    candidates
}
