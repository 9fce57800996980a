//! Entry normalization: parsed header + body + file identity → [`ContentItem`].
//!
//! All defaulting lives here so every category fetcher produces identical
//! shapes. Title falls back to the file-derived slug, missing dates become
//! the epoch sentinel, ratings parse permissively, and the structural
//! category is stamped by the caller rather than read from the document.

use chrono::{DateTime, NaiveDate, Utc};

use crate::frontmatter::{self, FrontMatter};
use crate::models::{Category, ContentItem, UNDATED};

/// Recognized document extension.
pub const DOCUMENT_EXT: &str = ".mdx";

/// Parse a raw document and normalize it in one step.
pub fn normalize_document(raw: &str, file_name: &str, category: Category) -> ContentItem {
    let (fm, body) = frontmatter::parse(raw);
    normalize(&fm, &body, file_name, category)
}

/// Build a [`ContentItem`] from parsed header fields, body text, the source
/// file name, and the fetcher's category.
pub fn normalize(fm: &FrontMatter, body: &str, file_name: &str, category: Category) -> ContentItem {
    let slug = slug_from(file_name);

    let title = fm
        .get_non_empty("title")
        .unwrap_or(&slug)
        .to_string();

    let description = fm.get_non_empty("description").unwrap_or("").to_string();

    let date = fm
        .get_non_empty("date")
        .and_then(parse_date)
        .unwrap_or(UNDATED);

    let tags = fm
        .get("tags")
        .map(frontmatter::split_tags)
        .unwrap_or_default();

    let category_label = fm
        .get_non_empty("category")
        .unwrap_or(category.tag_name())
        .to_string();

    let rating = fm.get("rating").and_then(|v| v.trim().parse::<f64>().ok());

    ContentItem {
        title,
        description,
        date,
        tags,
        slug,
        content: body.trim().to_string(),
        category,
        category_label,
        url: fm.get_non_empty("url").map(str::to_string),
        image: fm.get_non_empty("image").map(str::to_string),
        rating,
    }
}

/// Derive the slug from a file name: only the trailing recognized
/// extension is stripped, so `a.b.mdx` becomes `a.b`.
pub fn slug_from(file_name: &str) -> String {
    file_name
        .strip_suffix(DOCUMENT_EXT)
        .unwrap_or(file_name)
        .to_string()
}

/// Parse a header date value into a UTC timestamp.
///
/// Upstream documents are hand-authored and use several shapes: ISO dates,
/// full RFC 3339 timestamps, US-style `10/23/2024`, English month names
/// (`May 12, 2024`), and dotted `23.10.2024`. Anything else is unparsable
/// and the caller falls back to [`UNDATED`].
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%d.%m.%Y"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}
