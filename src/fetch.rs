//! HTTP fetching behind a trait seam.
//!
//! The engine only ever asks for "the body at this URL within this timeout".
//! [`HttpFetcher`] answers with `reqwest`; tests answer with a fixed map of
//! pages so nothing touches the network.
//!
//! Every fetch is attempted exactly once. A timeout is reported as
//! [`FetchReason::Timeout`] and handled like any other fetch failure.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tracing::{debug, instrument, warn};

use crate::config::Settings;
use crate::error::{FetchReason, HarvestError, Result};
use crate::utils::truncate_for_log;

/// Something that can GET a page and hand back its text.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Fetch `url`, giving up after `timeout`.
    ///
    /// Non-2xx responses are failures.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String>;
}

/// `reqwest`-backed fetcher sending browser-like headers.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| HarvestError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self), fields(timeout_ms = timeout.as_millis() as u64))]
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Non-success status");
            return Err(HarvestError::fetch(url, FetchReason::Status(status.as_u16())));
        }

        let body = response.text().await.map_err(|e| from_reqwest(url, e))?;
        debug!(
            %url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            preview = %truncate_for_log(&body, 120),
            "Fetched page"
        );
        Ok(body)
    }
}

fn from_reqwest(url: &str, e: reqwest::Error) -> HarvestError {
    let reason = if e.is_timeout() {
        FetchReason::Timeout
    } else if let Some(status) = e.status() {
        FetchReason::Status(status.as_u16())
    } else {
        FetchReason::Network(e.to_string())
    };
    HarvestError::fetch(url, reason)
}
