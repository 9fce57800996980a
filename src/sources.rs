//! Source construction and health listing.
//!
//! The one place that knows which [`ContentSource`] implementations exist.
//! Command runners go through [`load_timeline`] so they never touch the
//! concrete source types.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::aggregate::{Aggregator, FetchResult};
use crate::config::Config;
use crate::source::ContentSource;
use crate::source_fs::LocalSource;
use crate::source_github::GithubSource;

/// Build the configured content source.
pub fn build_source(config: &Config) -> Result<Arc<dyn ContentSource>> {
    match config.source.kind.as_str() {
        "github" => Ok(Arc::new(GithubSource::new(&config.source, &config.fetch))),
        "local" => Ok(Arc::new(LocalSource::new(&config.source)?)),
        other => bail!("Unknown source kind: '{}'. Must be github or local.", other),
    }
}

/// Fetch the whole timeline from the configured source.
pub async fn load_timeline(config: &Config) -> Result<FetchResult> {
    let source = build_source(config)?;
    let aggregator = Aggregator::new(source, config.categories.clone(), config.fetch.concurrency);
    aggregator.fetch_all().await
}

/// CLI entry point: list category directories and their health.
pub async fn list_sources(config: &Config) -> Result<()> {
    let source = build_source(config)?;
    println!("source: {}", source.label());
    println!();

    let aggregator = Aggregator::new(source, config.categories.clone(), config.fetch.concurrency);
    let result = aggregator.fetch_all().await?;

    println!("{:<14} {:<12} {:>5}  STATUS", "CATEGORY", "DIR", "ITEMS");
    for outcome in &result.outcomes {
        let status = match &outcome.error {
            Some(e) => format!("ERROR: {}", e),
            None => "OK".to_string(),
        };
        println!(
            "{:<14} {:<12} {:>5}  {}",
            outcome.category, outcome.dir, outcome.count, status
        );
    }
    Ok(())
}
