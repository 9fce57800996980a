//! Local directory source.
//!
//! Serves a directory tree on disk through the same [`ContentSource`] seam
//! the GitHub source implements, so a checkout of the content repository
//! can be browsed without network access. Paths use forward slashes
//! relative to the configured root, matching the remote source's path
//! language.
//!
//! # Configuration
//!
//! ```toml
//! [source]
//! kind = "local"
//! root = "./content"
//! exclude_globs = ["*.draft.mdx"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;

use crate::config::SourceConfig;
use crate::source::{ContentSource, EntryKind, FileEntry, SourceError};

pub struct LocalSource {
    root: PathBuf,
    excludes: GlobSet,
}

impl LocalSource {
    pub fn new(source: &SourceConfig) -> Result<Self> {
        let root = source
            .root
            .clone()
            .ok_or_else(|| anyhow::anyhow!("source.root not configured"))?;
        let excludes = build_globset(&source.exclude_globs)?;
        Ok(Self { root, excludes })
    }

    fn full_path(&self, path: &str) -> PathBuf {
        let path = path.trim_matches('/');
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl ContentSource for LocalSource {
    fn label(&self) -> String {
        format!("local:{}", self.root.display())
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, SourceError> {
        let full = self.full_path(path);
        debug!("listing {}", full.display());

        let meta = tokio::fs::metadata(&full).await.map_err(|e| io_error(e, path))?;
        if meta.is_file() {
            return Err(SourceError::PathNotFound(format!(
                "'{}' is a file, not a directory",
                path
            )));
        }

        let mut read_dir = tokio::fs::read_dir(&full)
            .await
            .map_err(|e| io_error(e, path))?;

        let prefix = path.trim_matches('/');
        let mut entries = Vec::new();
        while let Some(dirent) = read_dir
            .next_entry()
            .await
            .map_err(|e| io_error(e, path))?
        {
            let name = dirent.file_name().to_string_lossy().to_string();
            let rel = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            if self.excludes.is_match(&rel) {
                continue;
            }
            let file_type = dirent.file_type().await.map_err(|e| io_error(e, path))?;
            let kind = if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::Other
            };
            entries.push(FileEntry {
                name,
                path: rel,
                kind,
                download_url: None,
            });
        }

        // Directory iteration order is platform-defined; sort for
        // deterministic listings.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn read_file(&self, path: &str) -> Result<String, SourceError> {
        let full = self.full_path(path);

        let meta = tokio::fs::metadata(&full).await.map_err(|e| io_error(e, path))?;
        if meta.is_dir() {
            return Err(SourceError::PathNotFound(format!(
                "'{}' is a directory, not a file",
                path
            )));
        }

        let bytes = tokio::fs::read(&full).await.map_err(|e| io_error(e, path))?;
        String::from_utf8(bytes)
            .map_err(|e| SourceError::Decode(format!("'{}' is not valid UTF-8: {}", path, e)))
    }
}

fn io_error(e: std::io::Error, path: &str) -> SourceError {
    if e.kind() == std::io::ErrorKind::NotFound {
        SourceError::PathNotFound(format!("'{}' does not exist", path))
    } else {
        SourceError::Unavailable(format!("'{}': {}", path, e))
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
