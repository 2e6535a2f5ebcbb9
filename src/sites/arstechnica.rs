//! Ars Technica adapter.

use url::Url;

use super::{SiteAdapter, has_year_segment};
use crate::extract::{FieldSource, SiteProfile};

fn accept_link(url: &Url) -> bool {
    url.host_str().is_some_and(|h| h.ends_with("arstechnica.com"))
        && has_year_segment(url)
        && !url.path().starts_with("/author/")
}

pub static ADAPTER: SiteAdapter = SiteAdapter {
    name: "Ars Technica",
    hosts: &["arstechnica.com"],
    listing_url: "https://arstechnica.com/",
    link_selector: "article h2 a[href]",
    accept_link,
    title_chain: &[
        FieldSource::Attr(r#"meta[property="og:title"]"#, "content"),
        FieldSource::Text("h1"),
    ],
    author_chain: &[
        FieldSource::Attr(r#"meta[name="author"]"#, "content"),
        FieldSource::Text(r#"a[href*="/author/"]"#),
    ],
    date_chain: &[
        FieldSource::Attr(r#"meta[property="article:published_time"]"#, "content"),
        FieldSource::Attr("time[datetime]", "datetime"),
    ],
    profile: SiteProfile {
        headline: Some("h1"),
        byline: Some(r#"a[href*="/author/"]"#),
        dateline: Some("time"),
    },
    max_records: None,
};
