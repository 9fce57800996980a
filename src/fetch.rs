//! Timeline fetch command.

use anyhow::Result;

use crate::config::Config;
use crate::query;
use crate::sources;

/// CLI entry point: fetch everything and print the merged timeline.
///
/// With `--json` the items go to stdout as a JSON array for piping into
/// a site build. `--limit` keeps only the leading entries, the slice a
/// front page shows as featured.
pub async fn run_fetch(config: &Config, json: bool, limit: Option<usize>) -> Result<()> {
    let result = sources::load_timeline(config).await?;

    for outcome in &result.outcomes {
        if let Some(ref error) = outcome.error {
            eprintln!(
                "Warning: category '{}' unavailable: {}",
                outcome.category, error
            );
        }
    }

    let items = match limit {
        Some(n) => query::featured(&result.items, n),
        None => &result.items[..],
    };

    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    for item in items {
        println!(
            "{:<10} [{:<13}] {} ({})",
            item.date_label(),
            item.category,
            item.title,
            item.slug
        );
    }
    println!();
    println!("{} of {} items", items.len(), result.items.len());
    Ok(())
}
