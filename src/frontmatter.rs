//! Front-matter parsing for `.mdx` documents.
//!
//! A document may open with a header block bounded by `---` marker lines:
//!
//! ```text
//! ---
//! title: ditto
//! tags: ai, dev
//! ---
//! Body text...
//! ```
//!
//! Only the first two marker lines delimit the header; any later markers
//! are ordinary body text. The opening marker must be the document's first
//! line. A document without a complete marker block has no header and is
//! all body. Header lines are `key: value`; lines of any other shape are
//! ignored rather than rejected, because upstream content is authored by
//! hand and inconsistently.

use std::collections::HashMap;

/// Parsed header fields.
///
/// Keys and values are trimmed; duplicate keys keep the last occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: HashMap<String, String>,
}

impl FrontMatter {
    /// Look up a header field by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|s| s.as_str())
    }

    /// Look up a field, treating a present-but-empty value as absent.
    ///
    /// Matches the upstream defaulting behavior, where `title:` with no
    /// value falls back the same way as no `title` line at all.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split a raw document into header fields and trimmed body text.
pub fn parse(raw: &str) -> (FrontMatter, String) {
    match extract_block(raw) {
        Some((header, body)) => (parse_header(header), body.trim().to_string()),
        None => (FrontMatter::default(), raw.trim().to_string()),
    }
}

/// Find the header block between the first two marker lines.
///
/// Returns the header text and everything after the closing marker, or
/// `None` when the document does not start with a marker or the block is
/// never closed (an unclosed opener is treated as body, not as a header).
fn extract_block(raw: &str) -> Option<(&str, &str)> {
    let after_open = match raw.split_once('\n') {
        Some((first, rest)) if is_marker(first) => rest,
        _ => return None,
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if is_marker(line) {
            let header = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}

/// A marker line is exactly `---`, allowing trailing whitespace and `\r`.
fn is_marker(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Parse `key: value` header lines. Lines without a colon, or with an
/// empty key, are skipped.
fn parse_header(header: &str) -> FrontMatter {
    let mut fields = HashMap::new();
    for line in header.lines() {
        let (key, value) = match line.split_once(':') {
            Some(kv) => kv,
            None => continue,
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = strip_quotes(value.trim());
        fields.insert(key.to_string(), value.to_string());
    }
    FrontMatter { fields }
}

/// Strip one pair of matching single or double quotes around a value.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Split a `tags` header value into cleaned tag tokens.
///
/// Commas separate tags. Each token has bracket characters stripped
/// (upstream sources sometimes author `[ai], [no code]`) and surrounding
/// whitespace trimmed; empty tokens are dropped. Order is preserved.
pub fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|token| token.replace(['[', ']'], ""))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .collect()
}
