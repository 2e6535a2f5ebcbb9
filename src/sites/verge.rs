//! The Verge adapter.
//!
//! Homepage headlines sit in `h2` anchors. Story URLs are either the older
//! dated form (`/2024/5/1/12345/slug`) or a section plus numeric id
//! (`/tech/812345/slug`); the numeric segment is what tells them apart from
//! hub and author pages.

use url::Url;

use super::SiteAdapter;
use crate::extract::{FieldSource, SiteProfile};

fn accept_link(url: &Url) -> bool {
    let on_site = url.host_str().is_some_and(|h| h.ends_with("theverge.com"));
    let has_story_id = url.path_segments().is_some_and(|mut segments| {
        segments.any(|s| s.len() >= 5 && s.chars().all(|c| c.is_ascii_digit()))
    });
    on_site && has_story_id
}

pub static ADAPTER: SiteAdapter = SiteAdapter {
    name: "The Verge",
    hosts: &["theverge.com"],
    listing_url: "https://www.theverge.com/",
    link_selector: "h2 a[href]",
    accept_link,
    title_chain: &[
        FieldSource::Attr(r#"meta[property="og:title"]"#, "content"),
        FieldSource::Attr(r#"meta[name="twitter:title"]"#, "content"),
    ],
    author_chain: &[
        FieldSource::Attr(r#"meta[name="parsely-author"]"#, "content"),
        FieldSource::Attr(r#"meta[name="author"]"#, "content"),
    ],
    date_chain: &[
        FieldSource::Attr(r#"meta[property="article:published_time"]"#, "content"),
        FieldSource::Attr(r#"meta[name="parsely-pub-date"]"#, "content"),
    ],
    profile: SiteProfile {
        headline: Some("h1"),
        byline: Some(r#"a[href*="/authors/"]"#),
        dateline: Some("time"),
    },
    max_records: None,
};
