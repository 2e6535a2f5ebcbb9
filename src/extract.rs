//! Field Extractor: one normalised [`ArticleRecord`] from an article page.
//!
//! Each field is resolved by walking an ordered fallback chain of
//! [`FieldSource`]s and taking the first non-empty value. The chains are
//! plain static data so new sources are a one-line change. A
//! [`SiteProfile`] lets a known publisher put its own selectors in front of
//! the generic chains.
//!
//! | Field | Chain (after the site selector) | Sentinel |
//! |-------|---------------------------------|----------|
//! | title | `og:title`, `twitter:title`, `<title>`, first `<h1>`, caller fallback | `No title` |
//! | author | `author`, `article:author`, `class="author"`, `class*="author"` | `Unknown` |
//! | date | `article:published_time`, `publish-date`, `date`, `time[datetime]`, `<time>` text, `.date`, `class*="date"` | `Unknown` |
//! | source | `og:site_name`, caller site name | `Unknown` |

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

use crate::models::ArticleRecord;
use crate::utils::element_text;

/// Where one candidate value for a field comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Whitespace-normalised text of the first matching element.
    Text(&'static str),
    /// Trimmed attribute value of the first matching element.
    Attr(&'static str, &'static str),
}

/// Field selectors compiled on first use; `None` marks one that does not parse.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<&'static str, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// The compiled form of `css`, parsed at most once per process.
pub(crate) fn compiled(css: &'static str) -> Option<Selector> {
    let cached = SELECTOR_CACHE
        .read()
        .ok()
        .and_then(|cache| cache.get(css).cloned());
    if let Some(cached) = cached {
        return cached;
    }

    let selector = match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(%css, error = %e, "Skipping unparseable field selector");
            None
        }
    };
    if let Ok(mut cache) = SELECTOR_CACHE.write() {
        cache.entry(css).or_insert_with(|| selector.clone());
    }
    selector
}

impl FieldSource {
    pub fn css(&self) -> &'static str {
        match self {
            FieldSource::Text(css) | FieldSource::Attr(css, _) => *css,
        }
    }

    /// First non-empty value this source yields in `doc`.
    pub fn resolve(&self, doc: &Html) -> Option<String> {
        let selector = compiled(self.css())?;

        doc.select(&selector).find_map(|element| {
            let value = match self {
                FieldSource::Text(_) => element_text(&element),
                FieldSource::Attr(_, attr) => element.value().attr(attr)?.trim().to_string(),
            };
            (!value.is_empty()).then_some(value)
        })
    }
}

/// Walk `chain` in order and return the first value found.
pub fn first_match(doc: &Html, chain: &[FieldSource]) -> Option<String> {
    chain.iter().find_map(|source| source.resolve(doc))
}

pub const TITLE_CHAIN: &[FieldSource] = &[
    FieldSource::Attr(r#"meta[property="og:title"]"#, "content"),
    FieldSource::Attr(r#"meta[name="twitter:title"]"#, "content"),
    FieldSource::Text("title"),
    FieldSource::Text("h1"),
];

pub const AUTHOR_CHAIN: &[FieldSource] = &[
    FieldSource::Attr(r#"meta[name="author"]"#, "content"),
    FieldSource::Attr(r#"meta[property="article:author"]"#, "content"),
    FieldSource::Text(r#"[class="author"]"#),
    FieldSource::Text(r#"[class*="author"]"#),
];

pub const DATE_CHAIN: &[FieldSource] = &[
    FieldSource::Attr(r#"meta[property="article:published_time"]"#, "content"),
    FieldSource::Attr(r#"meta[name="publish-date"]"#, "content"),
    FieldSource::Attr(r#"meta[name="date"]"#, "content"),
    FieldSource::Attr("time[datetime]", "datetime"),
    FieldSource::Text("time"),
    FieldSource::Text(".date"),
    FieldSource::Text(r#"[class*="date"]"#),
];

pub const SOURCE_CHAIN: &[FieldSource] = &[FieldSource::Attr(
    r#"meta[property="og:site_name"]"#,
    "content",
)];

/// Publisher-specific elements tried before the generic chains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteProfile {
    pub headline: Option<&'static str>,
    pub byline: Option<&'static str>,
    /// The element carrying the publication date under the headline.
    pub dateline: Option<&'static str>,
}

impl SiteProfile {
    /// No site-specific selectors; the generic chains alone.
    pub const GENERIC: SiteProfile = SiteProfile {
        headline: None,
        byline: None,
        dateline: None,
    };
}

fn site_value(doc: &Html, css: Option<&'static str>) -> Option<String> {
    css.and_then(|css| FieldSource::Text(css).resolve(doc))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Build a record for the article at `link` from its already-fetched HTML.
///
/// Never fails: every field that no source fills becomes its sentinel.
#[instrument(level = "debug", skip(html, profile), fields(bytes = html.len()))]
pub fn extract(
    html: &str,
    link: &str,
    fallback_title: &str,
    site_name: &str,
    profile: &SiteProfile,
) -> ArticleRecord {
    let doc = Html::parse_document(html);

    let title = site_value(&doc, profile.headline)
        .or_else(|| first_match(&doc, TITLE_CHAIN))
        .or_else(|| non_empty(fallback_title));
    let author = site_value(&doc, profile.byline).or_else(|| first_match(&doc, AUTHOR_CHAIN));
    let date = site_value(&doc, profile.dateline).or_else(|| first_match(&doc, DATE_CHAIN));
    let source = first_match(&doc, SOURCE_CHAIN).or_else(|| non_empty(site_name));

    debug!(
        has_title = title.is_some(),
        has_author = author.is_some(),
        has_date = date.is_some(),
        "Extracted article fields"
    );

    ArticleRecord::builder(link)
        .title(title.unwrap_or_default())
        .author(author.unwrap_or_default())
        .publication_date(date.unwrap_or_default())
        .source(source.unwrap_or_default())
        .build()
}
