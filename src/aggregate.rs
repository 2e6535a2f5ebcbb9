//! The Aggregator: picks the extraction path, merges, filters and orders.
//!
//! - No target URL: every built-in adapter runs concurrently and results are
//!   concatenated in registry order.
//! - Article-like target: the page is fetched and extracted directly.
//! - Listing-like target: links are discovered, every candidate is fetched
//!   concurrently, and results are reassembled in discovery order.
//!
//! Recovery happens as close to the failure as possible. A candidate that
//! cannot be fetched becomes a degraded record built from its anchor text;
//! a target page that cannot be fetched becomes one synthetic error record.

use futures::future::join_all;
use scraper::Html;
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::classify::classify;
use crate::config::Settings;
use crate::discovery::discover;
use crate::error::{ExtractedWithGaps, Extraction, HarvestError, Result, into_record};
use crate::extract::{SiteProfile, extract};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::models::{ArticleRecord, LinkCandidate, SortBy, UNKNOWN, UrlKind};
use crate::ordering::{filter_by_keyword, sort_records};
use crate::sites::{ADAPTERS, scrape_site, strategy_for};

/// Source value of the synthetic record returned when a target page fails.
pub const ERROR_SOURCE: &str = "Error";
/// Author value of the synthetic error record.
pub const ERROR_AUTHOR: &str = "System";

/// Extract, filter and order article records.
///
/// `target_url` empty means "all built-in sites". `keyword` empty disables
/// filtering. `sort_by` is `"date"`, `"relevance"`, or anything else for
/// aggregation order.
///
/// Recoverable failures come back as records. The only error is
/// [`HarvestError::InvalidUrl`] for a target URL that does not parse.
#[instrument(level = "info", skip(fetcher, settings))]
pub async fn run<F: Fetcher>(
    fetcher: &F,
    settings: &Settings,
    target_url: &str,
    keyword: &str,
    sort_by: &str,
) -> Result<Vec<ArticleRecord>> {
    let target = target_url.trim();
    let records = if target.is_empty() {
        run_adapters(fetcher, settings).await
    } else {
        run_target(fetcher, settings, target).await?
    };
    let aggregated = records.len();

    let mut records = filter_by_keyword(records, keyword);
    sort_records(&mut records, SortBy::parse(sort_by), keyword);

    info!(aggregated, returned = records.len(), "Run complete");
    Ok(records)
}

/// [`run`] with a fresh HTTP client, so nothing is shared between calls.
pub async fn run_with_http(
    settings: &Settings,
    target_url: &str,
    keyword: &str,
    sort_by: &str,
) -> Result<Vec<ArticleRecord>> {
    let fetcher = HttpFetcher::new(settings)?;
    run(&fetcher, settings, target_url, keyword, sort_by).await
}

#[instrument(level = "info", skip_all)]
async fn run_adapters<F: Fetcher>(fetcher: &F, settings: &Settings) -> Vec<ArticleRecord> {
    let per_site = join_all(
        ADAPTERS
            .iter()
            .map(|adapter| scrape_site(fetcher, adapter, settings)),
    )
    .await;
    per_site.into_iter().flatten().collect()
}

#[instrument(level = "info", skip(fetcher, settings))]
async fn run_target<F: Fetcher>(
    fetcher: &F,
    settings: &Settings,
    url: &str,
) -> Result<Vec<ArticleRecord>> {
    let kind = classify(url)?;
    let base = Url::parse(url).map_err(|e| HarvestError::invalid_url(url, e))?;
    let host = base.host_str().unwrap_or_default().to_string();
    let strategy = strategy_for(&host);
    let site_name = strategy.site_name(&host);
    let profile = strategy.profile();
    info!(?kind, %host, site = %site_name, "Dynamic extraction");

    match kind {
        UrlKind::ArticleLike => {
            let record = match fetcher.fetch(url, settings.article_timeout()).await {
                Ok(html) => extract(&html, url, "", &site_name, &profile),
                Err(e) => {
                    error!(%url, error = %e, "Article fetch failed");
                    error_record(url, &e)
                }
            };
            Ok(vec![record])
        }
        UrlKind::ListingLike => {
            let html = match fetcher.fetch(url, settings.listing_timeout()).await {
                Ok(html) => html,
                Err(e) => {
                    error!(%url, error = %e, "Listing fetch failed");
                    return Ok(vec![error_record(url, &e)]);
                }
            };
            let candidates = {
                let document = Html::parse_document(&html);
                discover(&document, &base, settings)
            };
            if candidates.is_empty() {
                warn!(%url, "No candidate article links found");
            }

            // join_all yields in input order, so records follow discovery order
            let extractions = join_all(candidates.iter().map(|candidate| {
                extract_candidate(fetcher, settings, candidate, &site_name, &profile)
            }))
            .await;
            Ok(extractions.into_iter().map(into_record).collect())
        }
    }
}

#[instrument(level = "debug", skip(fetcher, settings, profile), fields(url = %candidate.url))]
async fn extract_candidate<F: Fetcher>(
    fetcher: &F,
    settings: &Settings,
    candidate: &LinkCandidate,
    site_name: &str,
    profile: &SiteProfile,
) -> Extraction {
    match fetcher
        .fetch(&candidate.url, settings.article_timeout())
        .await
    {
        Ok(html) => Ok(extract(
            &html,
            &candidate.url,
            &candidate.text,
            site_name,
            profile,
        )),
        Err(e) => {
            warn!(url = %candidate.url, error = %e, "Candidate fetch failed; keeping anchor data");
            Err(ExtractedWithGaps {
                record: degraded_record(candidate, site_name),
                cause: e.to_string(),
            })
        }
    }
}

fn degraded_record(candidate: &LinkCandidate, site_name: &str) -> ArticleRecord {
    ArticleRecord::builder(&candidate.url)
        .title(&candidate.text)
        .author(UNKNOWN)
        .publication_date(UNKNOWN)
        .source(site_name)
        .build()
}

fn error_record(url: &str, err: &HarvestError) -> ArticleRecord {
    ArticleRecord::builder(url)
        .title(format!("Failed to fetch articles from {url}"))
        .author(ERROR_AUTHOR)
        .source(ERROR_SOURCE)
        .error(err.to_string())
        .build()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::error::FetchReason;
    use crate::fetch::testing::StaticFetcher;

    const FRONT: &str = "https://paper.example/front";

    fn listing_fetcher() -> StaticFetcher {
        let listing = r#"
            <h2><a href="/p/rates">Central bank holds rates steady</a></h2>
            <h2><a href="/p/slow">A story whose page times out</a></h2>
            <h2><a href="/p/ai">Labs report an AI breakthrough</a></h2>
            <a href="mailto:desk@paper.example">Contact the news desk today</a>
        "#;
        StaticFetcher::new()
            .page(FRONT, listing)
            .page(
                "https://paper.example/p/rates",
                r#"<meta property="og:title" content="Rates held"><meta name="author" content="Ann Blair"><meta property="article:published_time" content="2024-01-01T00:00:00Z">"#,
            )
            .failing("https://paper.example/p/slow", FetchReason::Timeout)
            .page(
                "https://paper.example/p/ai",
                r#"<title>AI breakthrough</title><meta property="og:site_name" content="Daily"><time datetime="2024-06-01">June</time>"#,
            )
    }

    fn assert_populated(records: &[ArticleRecord]) {
        for r in records {
            for value in [r.title(), r.link(), r.author(), r.publication_date(), r.source()] {
                assert!(!value.is_empty(), "empty field in {r:?}");
            }
        }
    }

    #[tokio::test]
    async fn test_listing_path_keeps_discovery_order_and_degrades() {
        let fetcher = listing_fetcher();
        let records = run(&fetcher, &Settings::default(), FRONT, "", "").await.unwrap();

        let titles: Vec<_> = records.iter().map(|r| r.title()).collect();
        assert_eq!(
            titles,
            ["Rates held", "A story whose page times out", "AI breakthrough"]
        );

        let degraded = &records[1];
        assert_eq!(degraded.link(), "https://paper.example/p/slow");
        assert_eq!(degraded.author(), UNKNOWN);
        assert_eq!(degraded.publication_date(), UNKNOWN);
        assert_eq!(degraded.source(), "paper.example");
        assert_eq!(degraded.error(), None);

        assert_eq!(records[0].source(), "paper.example");
        assert_eq!(records[2].source(), "Daily");
        assert_populated(&records);
    }

    #[tokio::test]
    async fn test_listing_and_article_timeouts() {
        let fetcher = listing_fetcher();
        run(&fetcher, &Settings::default(), FRONT, "", "").await.unwrap();
        let calls = fetcher.calls();
        assert_eq!(calls[0], (FRONT.to_string(), Settings::default().listing_timeout()));
        assert!(calls[1..]
            .iter()
            .all(|(_, t)| *t == Settings::default().article_timeout()));
    }

    #[tokio::test]
    async fn test_listing_failure_returns_single_error_record() {
        let fetcher = StaticFetcher::new().failing(
            FRONT,
            FetchReason::Network("dns error".to_string()),
        );
        let records = run(&fetcher, &Settings::default(), FRONT, "", "date").await.unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.source(), ERROR_SOURCE);
        assert_eq!(r.author(), ERROR_AUTHOR);
        assert!(r.title().contains(FRONT));
        assert!(r.error().unwrap().contains("dns error"));
        assert_eq!(r.link(), FRONT);
        assert_populated(&records);
    }

    #[tokio::test]
    async fn test_article_like_target_extracts_directly() {
        let url = "https://paper.example/2024/05/01/budget";
        let fetcher = StaticFetcher::new().page(
            url,
            r#"<h1>Budget passes</h1><span class="author">Lee</span>"#,
        );
        let records = run(&fetcher, &Settings::default(), url, "", "").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Budget passes");
        assert_eq!(records[0].author(), "Lee");
        assert_eq!(records[0].link(), url);
        assert_eq!(fetcher.calls()[0].1, Settings::default().article_timeout());
    }

    #[tokio::test]
    async fn test_article_like_failure_is_error_record() {
        let url = "https://paper.example/articles/gone";
        let fetcher = StaticFetcher::new().failing(url, FetchReason::Status(410));
        let records = run(&fetcher, &Settings::default(), url, "", "").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source(), ERROR_SOURCE);
        assert!(records[0].error().unwrap().contains("410"));
    }

    #[tokio::test]
    async fn test_invalid_target_url_is_an_error() {
        let fetcher = StaticFetcher::new();
        let result = run(&fetcher, &Settings::default(), "not a url", "", "").await;
        assert!(matches!(result, Err(HarvestError::InvalidUrl { .. })));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_registered_host_uses_adapter_name_and_profile() {
        let front = "https://www.bbc.com/sport";
        let fetcher = StaticFetcher::new()
            .page(
                front,
                r#"<h3><a href="/sport/football/articles/c1">Late winner seals the title</a></h3>"#,
            )
            .page(
                "https://www.bbc.com/sport/football/articles/c1",
                r#"<meta property="og:title" content="OG | BBC"><h1 id="main-heading">Late winner</h1>"#,
            );
        let records = run(&fetcher, &Settings::default(), front, "", "").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Late winner");
        assert_eq!(records[0].source(), "BBC News");
    }

    #[tokio::test]
    async fn test_keyword_and_relevance() {
        let fetcher = listing_fetcher();
        let records = run(&fetcher, &Settings::default(), FRONT, "ai", "relevance")
            .await
            .unwrap();
        // "Rates held" survives on its author (Ann Blair) and moves behind the title match
        let titles: Vec<_> = records.iter().map(|r| r.title()).collect();
        assert_eq!(titles, ["AI breakthrough", "Rates held"]);
    }

    #[tokio::test]
    async fn test_date_sort_over_run() {
        let fetcher = listing_fetcher();
        let records = run(&fetcher, &Settings::default(), FRONT, "", "date").await.unwrap();
        let dates: Vec<_> = records.iter().map(|r| r.publication_date()).collect();
        assert_eq!(dates, ["2024-06-01", "2024-01-01T00:00:00Z", UNKNOWN]);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let fetcher = listing_fetcher();
        let first = run(&fetcher, &Settings::default(), FRONT, "", "date").await.unwrap();
        let second = run(&fetcher, &Settings::default(), FRONT, "", "date").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    fn adapter_fetcher() -> StaticFetcher {
        StaticFetcher::new()
            .page(
                "https://techcrunch.com/",
                r#"<a class="loop-card__title-link" href="/2025/05/06/chips/">Chips</a>"#,
            )
            .page(
                "https://techcrunch.com/2025/05/06/chips/",
                r#"<meta property="og:title" content="Chip startup raises">"#,
            )
            .page(
                "https://www.bbc.com/news",
                r#"<a data-testid="internal-link" href="/news/articles/c9">Storm</a>"#,
            )
            .page(
                "https://www.bbc.com/news/articles/c9",
                r#"<h1>Storm warning issued</h1>"#,
            )
    }

    #[tokio::test]
    async fn test_no_target_runs_adapters_in_fixed_order() {
        // The Verge and Ars Technica listings answer 404 and contribute nothing
        let fetcher = adapter_fetcher();
        let records = run(&fetcher, &Settings::default(), "", "", "").await.unwrap();
        let sources: Vec<_> = records.iter().map(|r| r.source()).collect();
        assert_eq!(sources, ["TechCrunch", "BBC News"]);
        assert_eq!(records[0].title(), "Chip startup raises");
        assert_eq!(records[1].title(), "Storm warning issued");
        assert_populated(&records);
    }

    #[tokio::test(start_paused = true)]
    async fn test_adapters_run_concurrently_in_registry_order() {
        // BBC finishes first; TechCrunch still leads the output
        let fetcher = adapter_fetcher()
            .delayed("https://techcrunch.com/", Duration::from_millis(400))
            .delayed("https://www.theverge.com/", Duration::from_millis(400))
            .delayed("https://www.bbc.com/news", Duration::from_millis(100))
            .delayed("https://arstechnica.com/", Duration::from_millis(400));

        let started = Instant::now();
        let records = run(&fetcher, &Settings::default(), "", "", "").await.unwrap();
        let elapsed = started.elapsed();

        let sources: Vec<_> = records.iter().map(|r| r.source()).collect();
        assert_eq!(sources, ["TechCrunch", "BBC News"]);
        // one at a time would take 1300ms
        assert!(elapsed >= Duration::from_millis(400), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(800), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_candidates_fetched_concurrently_in_discovery_order() {
        // completion order is the reverse of discovery order
        let fetcher = listing_fetcher()
            .page("https://paper.example/p/slow", "<h1>Slow but complete</h1>")
            .delayed("https://paper.example/p/rates", Duration::from_millis(300))
            .delayed("https://paper.example/p/slow", Duration::from_millis(200))
            .delayed("https://paper.example/p/ai", Duration::from_millis(100));

        let started = Instant::now();
        let records = run(&fetcher, &Settings::default(), FRONT, "", "").await.unwrap();
        let elapsed = started.elapsed();

        let titles: Vec<_> = records.iter().map(|r| r.title()).collect();
        assert_eq!(titles, ["Rates held", "Slow but complete", "AI breakthrough"]);
        // one at a time would take 600ms
        assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(500), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_no_target_all_sites_down_is_empty_not_error() {
        let fetcher = StaticFetcher::new();
        let records = run(&fetcher, &Settings::default(), "  ", "", "").await.unwrap();
        assert!(records.is_empty());
        assert_eq!(fetcher.calls().len(), ADAPTERS.len());
    }
}
