//! Command-line interface definitions for Article Harvest.
//!
//! Every option can also be given through the environment where noted.

use clap::Parser;

/// Command-line arguments for the `article_harvest` binary.
///
/// # Examples
///
/// ```sh
/// # All built-in sites, newest first
/// article_harvest --sort-by date
///
/// # One listing page, filtered and ranked
/// article_harvest -u https://example.com/news -k climate -s relevance --pretty
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Page to extract from; omit to run the built-in site adapters
    #[arg(short, long, env = "HARVEST_URL", default_value = "")]
    pub url: String,

    /// Keep only records whose title, author or source contains this
    #[arg(short, long, default_value = "")]
    pub keyword: String,

    /// Result order: date, relevance or none
    #[arg(short, long, default_value = "none")]
    pub sort_by: String,

    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}
