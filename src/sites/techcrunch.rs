//! TechCrunch adapter.
//!
//! The homepage river links every story through `a.loop-card__title-link`,
//! and article URLs carry the publication date (`/2025/05/06/slug/`), which
//! separates stories from event and newsletter promos in the same river.

use url::Url;

use super::{SiteAdapter, has_year_segment};
use crate::extract::{FieldSource, SiteProfile};

fn accept_link(url: &Url) -> bool {
    url.host_str().is_some_and(|h| h.ends_with("techcrunch.com")) && has_year_segment(url)
}

pub static ADAPTER: SiteAdapter = SiteAdapter {
    name: "TechCrunch",
    hosts: &["techcrunch.com"],
    listing_url: "https://techcrunch.com/",
    link_selector: "a.loop-card__title-link",
    accept_link,
    title_chain: &[
        FieldSource::Attr(r#"meta[property="og:title"]"#, "content"),
        FieldSource::Text("h1"),
    ],
    author_chain: &[
        FieldSource::Attr(r#"meta[name="author"]"#, "content"),
        FieldSource::Text(".wp-block-tc23-author-card-name"),
    ],
    date_chain: &[
        FieldSource::Attr(r#"meta[property="article:published_time"]"#, "content"),
        FieldSource::Attr("time[datetime]", "datetime"),
    ],
    profile: SiteProfile {
        headline: Some("h1.article-hero__title"),
        byline: Some(".wp-block-tc23-author-card-name"),
        dateline: Some(".wp-block-post-date time"),
    },
    max_records: None,
};
