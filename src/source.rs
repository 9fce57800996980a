//! The content source seam.
//!
//! Everything upstream of normalization talks to storage through the
//! [`ContentSource`] trait: one call to list a directory, one call to read a
//! file as text. The aggregator receives the source as an injected trait
//! object, so category fetchers never know whether bytes came from the
//! GitHub contents API ([`crate::source_github`]), a local directory
//! ([`crate::source_fs`]), or an in-memory stub in tests.
//!
//! Sources are read-only. Transport decoding (base64, UTF-8) happens inside
//! the source; callers always see plain text or a [`SourceError`].

use async_trait::async_trait;

use crate::normalize::DOCUMENT_EXT;

/// Extensions recognized as cover-image candidates when scanning a listing.
const IMAGE_EXTS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];

/// What a listed entry is, as reported by the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules, and anything else a host may report.
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Base name within the listed directory, extension included.
    pub name: String,
    /// Path relative to the source root, usable in further source calls.
    pub path: String,
    pub kind: EntryKind,
    /// Direct download URL when the host provides one.
    pub download_url: Option<String>,
}

/// Failure taxonomy at the source boundary.
#[derive(Debug)]
pub enum SourceError {
    /// The backing store could not be reached or refused the request
    /// (network failure, non-success status, auth or rate-limit trouble).
    Unavailable(String),
    /// The requested path does not exist upstream, or has the wrong shape
    /// for the call (a file where a directory was asked for, or vice versa).
    PathNotFound(String),
    /// The payload arrived but could not be decoded to text.
    Decode(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Unavailable(msg) => write!(f, "source unavailable: {msg}"),
            SourceError::PathNotFound(msg) => write!(f, "path not found: {msg}"),
            SourceError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// A read-only tree of content files.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short label for logs and status output, e.g. `github:owner/repo`.
    fn label(&self) -> String;

    /// List the entries of one directory level. Does not recurse.
    async fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, SourceError>;

    /// Read one file and return its text, transport decoding already applied.
    async fn read_file(&self, path: &str) -> Result<String, SourceError>;
}

/// Whether a listing entry is a content document. Only plain files with the
/// document extension count; directories and stray assets are skipped.
pub fn is_document(entry: &FileEntry) -> bool {
    entry.kind == EntryKind::File && entry.name.ends_with(DOCUMENT_EXT)
}

/// Whether a listing entry looks like an image asset.
pub fn is_image(entry: &FileEntry) -> bool {
    if entry.kind != EntryKind::File {
        return false;
    }
    let lower = entry.name.to_ascii_lowercase();
    IMAGE_EXTS.iter().any(|ext| lower.ends_with(ext))
}

/// File stem used to pair an image with a document: `ditto.png` -> `ditto`.
pub fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
