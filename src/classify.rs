//! URL classification: single article vs listing page.
//!
//! The decision looks at the path only. A path is article-like when it has
//! an `/articles/` segment, a `/20YY/MM/DD/` date run, or a segment from a
//! small news vocabulary followed by a further segment (`/tech/some-slug`).
//! A vocabulary word as the final segment names a section front
//! (`/section/tech`) and stays listing-like, as does everything else.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::error::{HarvestError, Result};
use crate::models::UrlKind;

/// Segments that mark a path as pointing at one story.
pub const ARTICLE_SEGMENTS: &[&str] = &[
    "news", "story", "article", "post", "politics", "tech", "business",
];

static DATED_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/20\d{2}/\d{2}/\d{2}/").expect("static regex"));

/// Classify `url` from the shape of its path.
///
/// Fails with [`HarvestError::InvalidUrl`] before looking at the path when
/// `url` does not parse.
pub fn classify(url: &str) -> Result<UrlKind> {
    let parsed = Url::parse(url).map_err(|e| HarvestError::invalid_url(url, e))?;
    let kind = classify_path(parsed.path());
    debug!(%url, ?kind, "Classified URL");
    Ok(kind)
}

fn classify_path(path: &str) -> UrlKind {
    if path.contains("/articles/") || DATED_PATH.is_match(path) {
        return UrlKind::ArticleLike;
    }
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let vocabulary_hit = segments.iter().enumerate().any(|(i, segment)| {
        i + 1 < segments.len()
            && ARTICLE_SEGMENTS
                .iter()
                .any(|word| segment.eq_ignore_ascii_case(word))
    });
    if vocabulary_hit {
        UrlKind::ArticleLike
    } else {
        UrlKind::ListingLike
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dated_path_is_article() {
        assert_eq!(
            classify("https://site.com/2024/05/01/story").unwrap(),
            UrlKind::ArticleLike
        );
        assert_eq!(
            classify("https://site.com/2023/11/30/some-slug").unwrap(),
            UrlKind::ArticleLike
        );
    }

    #[test]
    fn test_articles_segment_is_article() {
        assert_eq!(
            classify("https://www.bbc.com/news/articles/c4ng0d2lq7yo").unwrap(),
            UrlKind::ArticleLike
        );
    }

    #[test]
    fn test_vocabulary_segment_is_case_insensitive() {
        assert_eq!(
            classify("https://site.com/Politics/some-slug").unwrap(),
            UrlKind::ArticleLike
        );
        assert_eq!(
            classify("https://site.com/BUSINESS/markets-rally").unwrap(),
            UrlKind::ArticleLike
        );
    }

    #[test]
    fn test_trailing_vocabulary_segment_is_section_front() {
        assert_eq!(
            classify("https://site.com/section/tech").unwrap(),
            UrlKind::ListingLike
        );
        assert_eq!(
            classify("https://www.bbc.com/news").unwrap(),
            UrlKind::ListingLike
        );
        assert_eq!(
            classify("https://site.com/category/business/").unwrap(),
            UrlKind::ListingLike
        );
    }

    #[test]
    fn test_vocabulary_must_match_whole_segment() {
        assert_eq!(
            classify("https://site.com/newsletter/signup").unwrap(),
            UrlKind::ListingLike
        );
    }

    #[test]
    fn test_section_page_is_listing() {
        assert_eq!(
            classify("https://site.com/section/sports").unwrap(),
            UrlKind::ListingLike
        );
        assert_eq!(classify("https://site.com/").unwrap(), UrlKind::ListingLike);
    }

    #[test]
    fn test_classification_ignores_query_and_host() {
        assert_eq!(
            classify("https://news.example.com/front?tag=story").unwrap(),
            UrlKind::ListingLike
        );
    }

    #[test]
    fn test_partial_date_is_listing() {
        assert_eq!(
            classify("https://site.com/2024/05/").unwrap(),
            UrlKind::ListingLike
        );
    }

    #[test]
    fn test_invalid_url_fails() {
        assert!(matches!(
            classify("not a url"),
            Err(HarvestError::InvalidUrl { .. })
        ));
        assert!(matches!(
            classify(""),
            Err(HarvestError::InvalidUrl { .. })
        ));
    }
}
