//! GitHub contents-API source.
//!
//! Reads directory listings and file bodies from a repository through the
//! REST contents endpoint. A directory path returns a JSON array of entries;
//! a file path returns a single object carrying the body as base64. Both
//! shapes are absorbed here so the rest of the crate only ever sees
//! [`FileEntry`] lists and decoded text.
//!
//! # Configuration
//!
//! ```toml
//! [source]
//! kind = "github"
//! owner = "acme"
//! repo = "site-content"
//! # api_base = "https://api.github.com"
//! # token_env = "GITHUB_TOKEN"
//! # ref = "main"
//! ```
//!
//! # Environment Variables
//!
//! The bearer token is read from the environment variable named by
//! `token_env` (default `GITHUB_TOKEN`). When unset, requests go out
//! unauthenticated, which works for public repositories at a lower rate
//! limit. Tokens never live in config files.
//!
//! # Errors
//!
//! - HTTP 404 maps to [`SourceError::PathNotFound`]
//! - any other non-success status, or a transport failure, maps to
//!   [`SourceError::Unavailable`]
//! - a body that is not decodable base64 UTF-8 maps to
//!   [`SourceError::Decode`]

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use log::debug;
use serde::Deserialize;

use crate::config::{FetchConfig, SourceConfig};
use crate::source::{ContentSource, EntryKind, FileEntry, SourceError};

const APP_USER_AGENT: &str = concat!("mdx-timeline/", env!("CARGO_PKG_VERSION"));

/// A repository read through the GitHub contents API.
pub struct GithubSource {
    owner: String,
    repo: String,
    api_base: String,
    git_ref: Option<String>,
    token: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl GithubSource {
    /// Build a source for the configured repository. The token environment
    /// variable is read once, here; an empty value counts as unset.
    pub fn new(source: &SourceConfig, fetch: &FetchConfig) -> Self {
        let token = std::env::var(&source.token_env)
            .ok()
            .filter(|t| !t.is_empty());
        Self {
            owner: source.owner.clone(),
            repo: source.repo.clone(),
            api_base: source.api_base.trim_end_matches('/').to_string(),
            git_ref: source.git_ref.clone(),
            token,
            timeout: Duration::from_secs(fetch.timeout_secs),
            client: reqwest::Client::new(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/repos/{}/{}/contents", self.api_base, self.owner, self.repo)
        } else {
            format!(
                "{}/repos/{}/{}/contents/{}",
                self.api_base, self.owner, self.repo, path
            )
        }
    }

    /// One GET against the contents endpoint, status checked, payload parsed.
    async fn fetch_path(&self, path: &str) -> Result<ContentsPayload, SourceError> {
        let url = self.url_for(path);
        debug!("GET {}", url);

        let mut req = self
            .client
            .get(&url)
            .header("User-Agent", APP_USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .timeout(self.timeout);
        if let Some(ref token) = self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(ref git_ref) = self.git_ref {
            req = req.query(&[("ref", git_ref.as_str())]);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(format!("request to {} failed: {}", url, e)))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::PathNotFound(format!(
                "'{}' does not exist in {}/{}",
                path, self.owner, self.repo
            )));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Unavailable(format!(
                "contents request failed (HTTP {}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        resp.json::<ContentsPayload>()
            .await
            .map_err(|e| SourceError::Unavailable(format!("unexpected contents payload: {}", e)))
    }
}

#[async_trait]
impl ContentSource for GithubSource {
    fn label(&self) -> String {
        format!("github:{}/{}", self.owner, self.repo)
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, SourceError> {
        match self.fetch_path(path).await? {
            ContentsPayload::Listing(entries) => {
                Ok(entries.into_iter().map(RawEntry::into_entry).collect())
            }
            ContentsPayload::File(_) => Err(SourceError::PathNotFound(format!(
                "'{}' is a file, not a directory",
                path
            ))),
        }
    }

    async fn read_file(&self, path: &str) -> Result<String, SourceError> {
        match self.fetch_path(path).await? {
            ContentsPayload::File(file) => decode_content(&file, path),
            ContentsPayload::Listing(_) => Err(SourceError::PathNotFound(format!(
                "'{}' is a directory, not a file",
                path
            ))),
        }
    }
}

// ============ Wire format ============

/// The two response shapes the contents endpoint can return for a path.
/// Arrays and objects are disjoint in JSON, so untagged dispatch is safe.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsPayload {
    Listing(Vec<RawEntry>),
    File(RawFile),
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    download_url: Option<String>,
}

impl RawEntry {
    fn into_entry(self) -> FileEntry {
        let kind = match self.kind.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            _ => EntryKind::Other,
        };
        FileEntry {
            name: self.name,
            path: self.path,
            kind,
            download_url: self.download_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawFile {
    content: String,
    encoding: String,
}

/// Decode a file payload to text. The API wraps the base64 body with
/// newlines every 60 characters, which strict decoding rejects, so all
/// whitespace is dropped first.
fn decode_content(file: &RawFile, path: &str) -> Result<String, SourceError> {
    if file.encoding != "base64" {
        return Err(SourceError::Decode(format!(
            "unexpected encoding '{}' for '{}'",
            file.encoding, path
        )));
    }
    let compact: String = file
        .content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| SourceError::Decode(format!("invalid base64 in '{}': {}", path, e)))?;
    String::from_utf8(bytes)
        .map_err(|e| SourceError::Decode(format!("'{}' is not valid UTF-8: {}", path, e)))
}
