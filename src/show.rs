//! Single-item detail command.
//!
//! Resolves a slug the way a deep link does: against the whole timeline,
//! newest first, optionally narrowed to one category. The neighbors
//! printed at the bottom are the items a prev/next control would reach.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::models::Category;
use crate::query::{Direction, Query};
use crate::sources;
use crate::view::TimelineView;

/// CLI entry point: print one item and its neighbors.
pub async fn run_show(config: &Config, slug: &str, category: Option<String>) -> Result<()> {
    let category = match category {
        Some(name) => match Category::from_tag_name(&name) {
            Some(c) => Some(c),
            None => bail!(
                "Unknown category: {}. Use project, writing, book, or link.",
                name
            ),
        },
        None => None,
    };

    let result = sources::load_timeline(config).await?;
    let mut view = TimelineView::new();
    view.install(result);
    if let Some(category) = category {
        view.set_query(Query {
            categories: vec![category],
            ..Query::default()
        });
    }

    view.select(slug);
    let item = match view.expanded() {
        Some(item) => item,
        None => {
            eprintln!("Error: no item with slug '{}'", slug);
            std::process::exit(1);
        }
    };

    println!("--- {} ---", item.title);
    println!("category: {} ({})", item.category, item.category_label);
    println!("date:     {}", item.date_label());
    println!("slug:     {}", item.slug);
    if !item.tags.is_empty() {
        println!("tags:     {}", item.tags.join(", "));
    }
    if let Some(ref url) = item.url {
        println!("url:      {}", url);
    }
    if let Some(ref image) = item.image {
        println!("image:    {}", image);
    }
    if let Some(rating) = item.rating {
        println!("rating:   {}", rating);
    }
    if !item.description.is_empty() {
        println!();
        println!("{}", item.description);
    }
    if !item.content.is_empty() {
        println!();
        println!("{}", item.content);
    }

    println!();
    if let Some(newer) = view.neighbor(Direction::Prev) {
        println!("newer: {} ({})", newer.title, newer.slug);
    }
    if let Some(older) = view.neighbor(Direction::Next) {
        println!("older: {} ({})", older.title, older.slug);
    }

    Ok(())
}
