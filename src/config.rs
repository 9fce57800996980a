use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::Category;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub categories: CategoriesConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_source_kind")]
    pub kind: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Name of the environment variable holding the bearer token. The token
    /// itself never appears in config files.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Branch, tag, or commit to read. Host default branch when unset.
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    /// Directory standing in for the repository root when kind is "local".
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

fn default_source_kind() -> String {
    "github".to_string()
}
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CategoriesConfig {
    #[serde(default = "default_projects_dir")]
    pub projects: String,
    #[serde(default = "default_writing_dir")]
    pub writing: String,
    #[serde(default = "default_books_dir")]
    pub books: String,
    #[serde(default = "default_links_dir")]
    pub links: String,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            projects: default_projects_dir(),
            writing: default_writing_dir(),
            books: default_books_dir(),
            links: default_links_dir(),
        }
    }
}

impl CategoriesConfig {
    /// Listing directory for a category.
    pub fn dir_for(&self, category: Category) -> &str {
        match category {
            Category::Project => &self.projects,
            Category::Writing => &self.writing,
            Category::Book => &self.books,
            Category::OutgoingLink => &self.links,
        }
    }
}

fn default_projects_dir() -> String {
    "projects".to_string()
}
fn default_writing_dir() -> String {
    "writing".to_string()
}
fn default_books_dir() -> String {
    "books".to_string()
}
fn default_links_dir() -> String {
    "links".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// How many file reads run in flight per category.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout_secs: 30,
        }
    }
}

fn default_concurrency() -> usize {
    4
}
fn default_timeout_secs() -> u64 {
    30
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate source
    match config.source.kind.as_str() {
        "github" => {
            if config.source.owner.is_empty() || config.source.repo.is_empty() {
                anyhow::bail!("source.owner and source.repo must be set when source.kind is 'github'");
            }
        }
        "local" => {
            if config.source.root.is_none() {
                anyhow::bail!("source.root must be set when source.kind is 'local'");
            }
        }
        other => anyhow::bail!("Unknown source kind: '{}'. Must be github or local.", other),
    }

    // Validate categories
    for category in Category::ALL {
        if config.categories.dir_for(category).trim_matches('/').is_empty() {
            anyhow::bail!("category directory for '{}' must not be empty", category);
        }
    }

    // Validate fetch
    if config.fetch.concurrency == 0 {
        anyhow::bail!("fetch.concurrency must be > 0");
    }
    if config.fetch.timeout_secs == 0 {
        anyhow::bail!("fetch.timeout_secs must be > 0");
    }

    Ok(config)
}
