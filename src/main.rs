//! # Article Harvest CLI
//!
//! Runs one extraction and prints the records as a JSON array on stdout.
//! Logs go to stderr and are controlled by `RUST_LOG` (default `info`).
//!
//! ```sh
//! article_harvest -u https://example.com/news -s date --pretty
//! ```

use std::error::Error;

use article_harvest::{Settings, run_with_http};
use clap::Parser;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("article_harvest starting up");

    let args = Cli::parse();
    debug!(
        url = %args.url,
        keyword = %args.keyword,
        sort_by = %args.sort_by,
        config = ?args.config,
        "Parsed CLI arguments"
    );

    let settings = Settings::load(args.config.as_deref()).inspect_err(|e| {
        error!(error = %e, "Could not load settings");
    })?;

    let records = run_with_http(&settings, &args.url, &args.keyword, &args.sort_by)
        .await
        .inspect_err(|e| error!(error = %e, "Extraction failed"))?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{output}");

    let elapsed = start_time.elapsed();
    info!(?elapsed, records = records.len(), "Execution complete");
    Ok(())
}
