//! Error types for the extraction engine.
//!
//! Only [`HarvestError::InvalidUrl`] ever escapes [`crate::run`]. Fetch
//! failures are recovered at the smallest enclosing scope and turned into
//! records; see [`crate::aggregate`].

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::models::ArticleRecord;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Why a single GET did not produce a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchReason {
    /// Connection, TLS, decoding or any other transport failure.
    Network(String),
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The per-request timeout elapsed.
    Timeout,
}

impl fmt::Display for FetchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchReason::Network(msg) => write!(f, "{msg}"),
            FetchReason::Status(code) => write!(f, "HTTP status {code}"),
            FetchReason::Timeout => write!(f, "request timed out"),
        }
    }
}

/// Unified engine error.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// The target URL could not be parsed.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A page could not be fetched (network error, non-2xx, or timeout).
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: FetchReason },

    /// A built-in CSS selector failed to compile.
    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl HarvestError {
    pub fn fetch(url: impl Into<String>, reason: FetchReason) -> Self {
        HarvestError::Fetch {
            url: url.into(),
            reason,
        }
    }

    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        HarvestError::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            HarvestError::Fetch {
                reason: FetchReason::Timeout,
                ..
            }
        )
    }
}

/// A record that could only be built from fallback data.
///
/// Serialises exactly like a complete record; the `cause` is kept for
/// logging only.
#[derive(Debug, Clone)]
pub struct ExtractedWithGaps {
    pub record: ArticleRecord,
    pub cause: String,
}

impl fmt::Display for ExtractedWithGaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "degraded record for {}: {}", self.record.link(), self.cause)
    }
}

impl std::error::Error for ExtractedWithGaps {}

/// Outcome of extracting one candidate article.
pub type Extraction = std::result::Result<ArticleRecord, ExtractedWithGaps>;

/// Collapse an [`Extraction`] into the record the caller sees.
pub fn into_record(extraction: Extraction) -> ArticleRecord {
    match extraction {
        Ok(record) => record,
        Err(gaps) => {
            debug!(%gaps, "Keeping degraded record");
            gaps.record
        }
    }
}
