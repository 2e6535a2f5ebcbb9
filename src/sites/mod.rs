//! Site adapters: fixed extraction pipelines for known publishers.
//!
//! Each adapter follows the same two-phase pattern:
//!
//! 1. **Indexing**: fetch the publisher's listing page and pick article links
//!    with one publisher-specific selector, deduplicated by URL and capped.
//! 2. **Fetching**: fetch each article in turn (never in parallel against
//!    the same publisher) and read fields with a short, mostly meta-tag
//!    fallback chain.
//!
//! A failed article fetch drops that article and is logged; a failed listing
//! fetch yields no records. Nothing here returns an error to the caller.
//!
//! # Supported Sources
//!
//! | Source | Module | Listing | Notes |
//! |--------|--------|---------|-------|
//! | TechCrunch | [`techcrunch`] | homepage river | dated article paths |
//! | The Verge | [`verge`] | homepage | |
//! | BBC News | [`bbc`] | `/news` | records bounded to 5 |
//! | Ars Technica | [`arstechnica`] | homepage | |
//!
//! The same table doubles as the host registry: [`strategy_for`] maps a
//! hostname to its adapter, or to the generic heuristic path.

use std::fmt;

use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::Settings;
use crate::error::{HarvestError, Result};
use crate::extract::{FieldSource, SOURCE_CHAIN, SiteProfile, first_match};
use crate::fetch::Fetcher;
use crate::models::{ArticleRecord, LinkCandidate};
use crate::utils::{element_text, normalize_whitespace, truncate_with_marker};

pub mod arstechnica;
pub mod bbc;
pub mod techcrunch;
pub mod verge;

/// Built-in adapters, in the order their results are concatenated.
pub static ADAPTERS: [&SiteAdapter; 4] = [
    &techcrunch::ADAPTER,
    &verge::ADAPTER,
    &bbc::ADAPTER,
    &arstechnica::ADAPTER,
];

/// Hand-tuned knowledge about one publisher.
pub struct SiteAdapter {
    /// Display name, used as the record `source`.
    pub name: &'static str,
    /// Registered hostnames; subdomains match too.
    pub hosts: &'static [&'static str],
    pub listing_url: &'static str,
    /// The single selector picking article anchors on the listing page.
    pub link_selector: &'static str,
    /// Publisher-specific acceptance test for a resolved link.
    pub accept_link: fn(&Url) -> bool,
    pub title_chain: &'static [FieldSource],
    pub author_chain: &'static [FieldSource],
    pub date_chain: &'static [FieldSource],
    /// Selectors the generic extractor tries first for this host.
    pub profile: SiteProfile,
    /// Hard bound on records, independent of the candidate cap.
    pub max_records: Option<usize>,
}

impl fmt::Debug for SiteAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteAdapter")
            .field("name", &self.name)
            .field("listing_url", &self.listing_url)
            .field("link_selector", &self.link_selector)
            .field("max_records", &self.max_records)
            .finish()
    }
}

impl SiteAdapter {
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{h}")))
    }
}

/// How a page on a given host gets its fields extracted.
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    Adapter(&'static SiteAdapter),
    Generic,
}

impl Strategy {
    pub fn profile(&self) -> SiteProfile {
        match self {
            Strategy::Adapter(adapter) => adapter.profile,
            Strategy::Generic => SiteProfile::GENERIC,
        }
    }

    /// The adapter's display name, or the host itself.
    pub fn site_name(&self, host: &str) -> String {
        match self {
            Strategy::Adapter(adapter) => adapter.name.to_string(),
            Strategy::Generic => host.to_string(),
        }
    }
}

/// Look up the extraction strategy registered for `host`.
pub fn strategy_for(host: &str) -> Strategy {
    ADAPTERS
        .iter()
        .find(|adapter| adapter.matches_host(host))
        .map_or(Strategy::Generic, |adapter| Strategy::Adapter(*adapter))
}

static YEAR_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/20\d{2}/").expect("static regex"));

/// True when the path has a `/20YY/` segment.
pub(crate) fn has_year_segment(url: &Url) -> bool {
    YEAR_SEGMENT.is_match(url.path())
}

/// Run one adapter end to end.
///
/// Never fails: listing problems yield an empty list, per-article problems
/// drop that article.
#[instrument(level = "info", skip_all, fields(site = adapter.name))]
pub async fn scrape_site<F: Fetcher>(
    fetcher: &F,
    adapter: &SiteAdapter,
    settings: &Settings,
) -> Vec<ArticleRecord> {
    let candidates = match index_articles(fetcher, adapter, settings).await {
        Ok(candidates) => candidates,
        Err(e) => {
            error!(site = adapter.name, error = %e, "Listing fetch failed; adapter yields nothing");
            return Vec::new();
        }
    };

    let mut records = fetch_articles(fetcher, adapter, candidates, settings).await;
    if let Some(max) = adapter.max_records {
        records.truncate(max);
    }
    info!(site = adapter.name, count = records.len(), "Adapter finished");
    records
}

/// Fetch the listing page and select candidate links.
#[instrument(level = "info", skip_all, fields(site = adapter.name, url = adapter.listing_url))]
pub async fn index_articles<F: Fetcher>(
    fetcher: &F,
    adapter: &SiteAdapter,
    settings: &Settings,
) -> Result<Vec<LinkCandidate>> {
    let base = Url::parse(adapter.listing_url)
        .map_err(|e| HarvestError::invalid_url(adapter.listing_url, e))?;
    let selector = Selector::parse(adapter.link_selector)
        .map_err(|e| HarvestError::Selector(format!("{}: {e}", adapter.link_selector)))?;

    let html = fetcher
        .fetch(adapter.listing_url, settings.listing_timeout())
        .await?;
    let candidates = select_links(&html, &base, &selector, adapter, settings.adapter_candidates);

    info!(count = candidates.len(), "Indexed article links");
    debug!(urls = ?candidates.iter().map(|c| &c.url).collect::<Vec<_>>(), "Adapter links");
    Ok(candidates)
}

fn select_links(
    html: &str,
    base: &Url,
    selector: &Selector,
    adapter: &SiteAdapter,
    limit: usize,
) -> Vec<LinkCandidate> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let resolved = base.join(href.trim()).ok()?;
            (adapter.accept_link)(&resolved).then(|| LinkCandidate {
                url: resolved.to_string(),
                text: element_text(&element),
            })
        })
        .unique_by(|candidate| candidate.url.clone())
        .take(limit)
        .collect()
}

/// Fetch candidates one after another; failures are logged and skipped.
#[instrument(level = "info", skip_all, fields(site = adapter.name, count = candidates.len()))]
pub async fn fetch_articles<F: Fetcher>(
    fetcher: &F,
    adapter: &SiteAdapter,
    candidates: Vec<LinkCandidate>,
    settings: &Settings,
) -> Vec<ArticleRecord> {
    let records: Vec<ArticleRecord> = stream::iter(candidates)
        .then(|candidate| async move {
            match fetcher
                .fetch(&candidate.url, settings.article_timeout())
                .await
            {
                Ok(html) => {
                    debug!(url = %candidate.url, "Fetched article");
                    Some(extract_article(adapter, &html, &candidate, settings))
                }
                Err(e) => {
                    warn!(url = %candidate.url, error = %e, "Article fetch failed; omitting");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(count = records.len(), "Fetched article contents");
    records
}

/// Read one article page with the adapter's own chains.
///
/// When the title chain comes up empty the listing anchor text stands in
/// and the record carries a truncated preview of the body text.
pub fn extract_article(
    adapter: &SiteAdapter,
    html: &str,
    candidate: &LinkCandidate,
    settings: &Settings,
) -> ArticleRecord {
    let document = Html::parse_document(html);

    let author = first_match(&document, adapter.author_chain).unwrap_or_default();
    let date = first_match(&document, adapter.date_chain).unwrap_or_default();
    let source = first_match(&document, SOURCE_CHAIN).unwrap_or_else(|| adapter.name.to_string());

    let builder = ArticleRecord::builder(&candidate.url)
        .author(author)
        .publication_date(date)
        .source(source);

    match first_match(&document, adapter.title_chain) {
        Some(title) => builder.title(title).build(),
        None => {
            let body = body_text(&document);
            let builder = builder.title(&candidate.text);
            if body.is_empty() {
                builder.build()
            } else {
                builder
                    .content(truncate_with_marker(&body, settings.content_preview_chars))
                    .build()
            }
        }
    }
}

static PARAGRAPHS: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("p").ok());

fn body_text(document: &Html) -> String {
    let Some(paragraphs) = PARAGRAPHS.as_ref() else {
        return String::new();
    };
    let joined = document
        .select(paragraphs)
        .map(|p| element_text(&p))
        .filter(|t| !t.is_empty())
        .join(" ");
    normalize_whitespace(&joined)
}
