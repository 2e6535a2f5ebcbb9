//! BBC News adapter.
//!
//! The `/news` front links stories through `data-testid="internal-link"`
//! anchors; only `/news/articles/` targets are stories (the rest are live
//! pages, videos and section fronts). BBC output is bounded to five records
//! whatever the configured candidate cap.

use url::Url;

use super::SiteAdapter;
use crate::extract::{FieldSource, SiteProfile};

fn accept_link(url: &Url) -> bool {
    url.path().starts_with("/news/articles/")
}

pub static ADAPTER: SiteAdapter = SiteAdapter {
    name: "BBC News",
    hosts: &["bbc.com", "bbc.co.uk"],
    listing_url: "https://www.bbc.com/news",
    link_selector: r#"a[data-testid="internal-link"]"#,
    accept_link,
    title_chain: &[
        FieldSource::Attr(r#"meta[property="og:title"]"#, "content"),
        FieldSource::Text("h1"),
    ],
    author_chain: &[
        FieldSource::Attr(r#"meta[name="author"]"#, "content"),
        FieldSource::Text(r#"[data-testid="byline-new-contributors"] span"#),
    ],
    date_chain: &[FieldSource::Attr("time[datetime]", "datetime")],
    profile: SiteProfile {
        headline: Some("h1#main-heading"),
        byline: Some(r#"[data-testid="byline-new-contributors"] span"#),
        dateline: Some(r#"[data-testid="timestamp"]"#),
    },
    max_records: Some(5),
};
