//! Filtering and lookup over a fetched timeline.
//!
//! The functions here are pure views over an item slice; nothing mutates
//! or clones the collection. A [`Query`] combines a free-text needle, a
//! category set, and a tag set. Every empty part is a no-op, so the
//! default query matches everything and filters only narrow.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::models::{Category, ContentItem};
use crate::sources;

/// Combined filter over the timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Case-insensitive substring matched against title, description, and
    /// tags. Empty matches everything.
    pub text: String,
    /// Item's category must be one of these. Empty matches everything.
    pub categories: Vec<Category>,
    /// Item must carry at least one of these tags. Empty matches everything.
    pub tags: Vec<String>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.categories.is_empty() && self.tags.is_empty()
    }
}

/// Whether one item satisfies every part of the query.
pub fn matches(item: &ContentItem, query: &Query) -> bool {
    if !query.categories.is_empty() && !query.categories.contains(&item.category) {
        return false;
    }
    if !query.tags.is_empty() {
        let has_any = query
            .tags
            .iter()
            .any(|want| item.tags.iter().any(|have| have == want));
        if !has_any {
            return false;
        }
    }
    if !query.text.is_empty() {
        let needle = query.text.to_lowercase();
        let hit = item.title.to_lowercase().contains(&needle)
            || item.description.to_lowercase().contains(&needle)
            || item.tags.iter().any(|t| t.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    true
}

/// Items passing the query, in timeline order.
pub fn apply<'a>(items: &'a [ContentItem], query: &Query) -> Vec<&'a ContentItem> {
    items.iter().filter(|item| matches(item, query)).collect()
}

pub fn search<'a>(items: &'a [ContentItem], text: &str) -> Vec<&'a ContentItem> {
    apply(
        items,
        &Query {
            text: text.to_string(),
            ..Query::default()
        },
    )
}

pub fn filter_by_categories<'a>(
    items: &'a [ContentItem],
    categories: &[Category],
) -> Vec<&'a ContentItem> {
    apply(
        items,
        &Query {
            categories: categories.to_vec(),
            ..Query::default()
        },
    )
}

pub fn filter_by_tags<'a>(items: &'a [ContentItem], tags: &[String]) -> Vec<&'a ContentItem> {
    apply(
        items,
        &Query {
            tags: tags.to_vec(),
            ..Query::default()
        },
    )
}

/// First item carrying the slug, in timeline order. Slugs are unique
/// within a category but can repeat across categories; the flat lookup
/// resolves to the newest holder.
pub fn find_by_slug<'a>(items: &'a [ContentItem], slug: &str) -> Option<&'a ContentItem> {
    items.iter().find(|item| item.slug == slug)
}

pub fn find_in_category<'a>(
    items: &'a [ContentItem],
    category: Category,
    slug: &str,
) -> Option<&'a ContentItem> {
    items
        .iter()
        .find(|item| item.category == category && item.slug == slug)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the front of the sequence (newer).
    Prev,
    /// Toward the back (older).
    Next,
}

/// Neighbor of the slug's item within the given sequence. No wraparound:
/// at either end the answer is `None`.
pub fn adjacent<'a>(
    items: &'a [ContentItem],
    slug: &str,
    direction: Direction,
) -> Option<&'a ContentItem> {
    let pos = items.iter().position(|item| item.slug == slug)?;
    match direction {
        Direction::Prev => pos.checked_sub(1).map(|i| &items[i]),
        Direction::Next => items.get(pos + 1),
    }
}

/// Leading slice of a collection, for a front-page rail. Asking for more
/// than exists returns what there is.
pub fn featured(items: &[ContentItem], count: usize) -> &[ContentItem] {
    &items[..count.min(items.len())]
}

/// CLI entry point: fetch, filter, print.
pub async fn run_search(
    config: &Config,
    text: &str,
    categories: Vec<String>,
    tags: Vec<String>,
) -> Result<()> {
    let categories = categories
        .iter()
        .map(|name| match Category::from_tag_name(name) {
            Some(c) => Ok(c),
            None => bail!(
                "Unknown category: {}. Use project, writing, book, or link.",
                name
            ),
        })
        .collect::<Result<Vec<_>>>()?;

    let result = sources::load_timeline(config).await?;
    let query = Query {
        text: text.to_string(),
        categories,
        tags,
    };
    let hits = apply(&result.items, &query);

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, item) in hits.iter().enumerate() {
        println!(
            "{}. [{}] {} ({})",
            i + 1,
            item.category,
            item.title,
            item.date_label()
        );
        println!("    slug: {}", item.slug);
        if !item.tags.is_empty() {
            println!("    tags: {}", item.tags.join(", "));
        }
        if !item.description.is_empty() {
            println!("    \"{}\"", item.description);
        }
        println!();
    }

    Ok(())
}
