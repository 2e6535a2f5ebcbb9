//! Data models for extracted articles and the values that steer a run.
//!
//! - [`ArticleRecord`]: the one domain entity, always fully populated
//! - [`LinkCandidate`]: an `(absolute url, anchor text)` pair found on a listing page
//! - [`UrlKind`]: result of classifying a target URL
//! - [`SortBy`]: requested ordering of the final sequence
//!
//! Records serialise with camelCase keys (`publicationDate`) because that
//! is the shape the HTTP layer in front of the engine returns verbatim.

use serde::Serialize;

/// Placeholder for an author, date or source nobody could find.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a title when every source, including the caller's, is empty.
pub const NO_TITLE: &str = "No title";

/// A single extracted article.
///
/// Fields are private so the "never empty" guarantee holds: the only way to
/// build one is [`ArticleRecord::builder`], which substitutes sentinels for
/// blank values. Once built a record is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    title: String,
    link: String,
    author: String,
    publication_date: String,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ArticleRecord {
    /// Start building a record for the article at `link`.
    pub fn builder(link: impl Into<String>) -> ArticleRecordBuilder {
        ArticleRecordBuilder {
            link: link.into(),
            ..ArticleRecordBuilder::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn publication_date(&self) -> &str {
        &self.publication_date
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Collects raw field values; [`build`](ArticleRecordBuilder::build) trims
/// them and fills gaps.
#[derive(Debug, Default)]
pub struct ArticleRecordBuilder {
    link: String,
    title: Option<String>,
    author: Option<String>,
    publication_date: Option<String>,
    source: Option<String>,
    content: Option<String>,
    error: Option<String>,
}

impl ArticleRecordBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn publication_date(mut self, date: impl Into<String>) -> Self {
        self.publication_date = Some(date.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn build(self) -> ArticleRecord {
        ArticleRecord {
            title: or_sentinel(self.title, NO_TITLE),
            link: self.link.trim().to_string(),
            author: or_sentinel(self.author, UNKNOWN),
            publication_date: or_sentinel(self.publication_date, UNKNOWN),
            source: or_sentinel(self.source, UNKNOWN),
            content: self.content,
            error: self.error,
        }
    }
}

fn or_sentinel(value: Option<String>, sentinel: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => sentinel.to_string(),
    }
}

/// An article link found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkCandidate {
    /// Absolute URL, already resolved against the listing page.
    pub url: String,
    /// Whitespace-normalised anchor text.
    pub text: String,
}

/// What a target URL most likely points at, judged from its path alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    ArticleLike,
    ListingLike,
}

/// Requested ordering of the final sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Newest first; unparseable dates last.
    Date,
    /// Records whose title contains the keyword first.
    Relevance,
    /// Aggregation order.
    #[default]
    None,
}

impl SortBy {
    /// Map the caller's value. Only the exact strings `date` and
    /// `relevance` reorder; anything else keeps aggregation order.
    pub fn parse(value: &str) -> Self {
        match value {
            "date" => SortBy::Date,
            "relevance" => SortBy::Relevance,
            _ => SortBy::None,
        }
    }
}
