//! Runtime settings for the extraction engine.
//!
//! Every field has a default, so an empty (or absent) YAML file yields the
//! stock behaviour:
//!
//! ```yaml
//! listing_timeout_secs: 10
//! article_timeout_secs: 5
//! max_links: 8
//! raw_link_cap: 10
//! min_anchor_chars: 10
//! adapter_candidates: 5
//! content_preview_chars: 200
//! link_dedup: pair        # or "url"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::{HarvestError, Result};

/// A desktop browser identification; several publishers reject obvious bots.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Which key collapses duplicate listing links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkDedup {
    /// Identical `(url, anchor text)` pairs collapse; the same URL under two
    /// different anchor texts is kept twice.
    #[default]
    Pair,
    /// One entry per URL, first anchor text wins.
    Url,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub listing_timeout_secs: u64,
    pub article_timeout_secs: u64,
    pub user_agent: String,
    /// Link Discovery result bound.
    pub max_links: usize,
    /// Raw candidates collected before trimming to `max_links`.
    pub raw_link_cap: usize,
    /// Anchor text must be strictly longer than this many characters.
    pub min_anchor_chars: usize,
    /// Per-adapter candidate bound.
    pub adapter_candidates: usize,
    pub content_preview_chars: usize,
    pub link_dedup: LinkDedup,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listing_timeout_secs: 10,
            article_timeout_secs: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_links: 8,
            raw_link_cap: 10,
            min_anchor_chars: 10,
            adapter_candidates: 5,
            content_preview_chars: 200,
            link_dedup: LinkDedup::Pair,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or return defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(Path::new(path))?;
        let settings = Self::from_yaml(&raw)?;
        info!(path, "Loaded settings");
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let settings: Settings = if raw.trim().is_empty() {
            Settings::default()
        } else {
            serde_yaml::from_str(raw)?
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.listing_timeout_secs == 0 || self.article_timeout_secs == 0 {
            return Err(HarvestError::Config(
                "timeouts must be at least one second".to_string(),
            ));
        }
        if self.max_links == 0 {
            return Err(HarvestError::Config("max_links must be positive".to_string()));
        }
        if self.max_links > self.raw_link_cap {
            return Err(HarvestError::Config(format!(
                "max_links ({}) cannot exceed raw_link_cap ({})",
                self.max_links, self.raw_link_cap
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(HarvestError::Config("user_agent cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    pub fn article_timeout(&self) -> Duration {
        Duration::from_secs(self.article_timeout_secs)
    }
}
