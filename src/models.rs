//! Core data model for the timeline pipeline.
//!
//! These types represent the normalized entries that flow from the content
//! source through aggregation into the query engine.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Sentinel date for items whose header carries no parsable date. The epoch
/// sorts after every real publication date in the newest-first timeline.
pub const UNDATED: DateTime<Utc> = DateTime::UNIX_EPOCH;

/// Content kind assigned by the category fetcher that sourced an entry.
///
/// Structural, fixed per fetcher, and never read from the document itself.
/// A document's own free-text `category` header only feeds the cosmetic
/// [`ContentItem::category_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Project,
    Writing,
    Book,
    OutgoingLink,
}

impl Category {
    /// All categories in aggregation order.
    pub const ALL: [Category; 4] = [
        Category::Project,
        Category::Writing,
        Category::Book,
        Category::OutgoingLink,
    ];

    /// Stable tag name used in filters and serialized output.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Category::Project => "project",
            Category::Writing => "writing",
            Category::Book => "book",
            Category::OutgoingLink => "outgoing_link",
        }
    }

    /// Parse a tag name as written in CLI flags (`link` is accepted as a
    /// shorthand for `outgoing_link`).
    pub fn from_tag_name(s: &str) -> Option<Category> {
        match s {
            "project" => Some(Category::Project),
            "writing" => Some(Category::Writing),
            "book" => Some(Category::Book),
            "outgoing_link" | "link" => Some(Category::OutgoingLink),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.tag_name())
    }
}

/// One normalized unit of displayable content.
///
/// Constructed fresh on every aggregation run, immutable afterwards, and
/// discarded wholesale when a newer run replaces the collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    pub title: String,
    pub description: String,
    /// Publication date. Missing or unparsable dates normalize to the Unix
    /// epoch so they sort last in the descending timeline, never to "now".
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    /// File name minus the trailing `.mdx` extension.
    pub slug: String,
    pub content: String,
    pub category: Category,
    /// Cosmetic label: the header's `category` field, else the tag name.
    pub category_label: String,
    pub url: Option<String>,
    pub image: Option<String>,
    /// Book rating; opaque magnitude, not normalized.
    pub rating: Option<f64>,
}

impl ContentItem {
    /// Date formatted for display, with the sentinel spelled out.
    pub fn date_label(&self) -> String {
        if self.date == UNDATED {
            "undated".to_string()
        } else {
            self.date.format("%Y-%m-%d").to_string()
        }
    }
}
