//! Keyword filtering and result ordering.
//!
//! Both operate on whole records: a record is kept or dropped, moved or
//! left in place, but never rewritten.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::models::{ArticleRecord, SortBy};

/// Keep records whose title, author or source contains `keyword`,
/// ignoring case. Only the empty string disables the filter; whitespace is
/// matched literally.
pub fn filter_by_keyword(records: Vec<ArticleRecord>, keyword: &str) -> Vec<ArticleRecord> {
    let needle = keyword.to_lowercase();
    if needle.is_empty() {
        return records;
    }
    let before = records.len();
    let kept: Vec<ArticleRecord> = records
        .into_iter()
        .filter(|r| {
            [r.title(), r.author(), r.source()]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect();
    debug!(keyword = %needle, before, after = kept.len(), "Applied keyword filter");
    kept
}

/// Reorder `records` in place.
///
/// - [`SortBy::Date`]: newest first; unparseable dates go last, in their
///   original relative order.
/// - [`SortBy::Relevance`]: a stable partition, titles containing `keyword`
///   first. Without a keyword nothing moves.
/// - [`SortBy::None`]: nothing moves.
pub fn sort_records(records: &mut Vec<ArticleRecord>, sort_by: SortBy, keyword: &str) {
    match sort_by {
        SortBy::Date => sort_by_date(records),
        SortBy::Relevance => partition_by_title(records, keyword),
        SortBy::None => {}
    }
}

fn sort_by_date(records: &mut [ArticleRecord]) {
    // stable: records with equal keys, including all unparseable ones, keep their order
    records.sort_by_cached_key(|r| {
        let parsed = parse_publication_date(r.publication_date());
        (parsed.is_none(), Reverse(parsed))
    });
}

fn partition_by_title(records: &mut Vec<ArticleRecord>, keyword: &str) {
    let needle = keyword.to_lowercase();
    if needle.is_empty() {
        return;
    }
    let (mut matching, rest): (Vec<_>, Vec<_>) = std::mem::take(records)
        .into_iter()
        .partition(|r| r.title().to_lowercase().contains(&needle));
    matching.extend(rest);
    *records = matching;
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parse the free-form date strings publishers emit.
///
/// Offset-less values are taken as UTC; bare dates as UTC midnight.
/// Returns `None` for anything else, including the `Unknown` sentinel.
pub fn parse_publication_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}
