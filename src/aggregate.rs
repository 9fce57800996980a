//! Content aggregation.
//!
//! One [`Aggregator`] owns the injected source and the category map. A
//! fetch lists each category directory, reads the documents it finds with
//! bounded concurrency, normalizes them, and merges the four category
//! slices into a single timeline ordered newest first.
//!
//! Failure handling is deliberately lopsided. A single unreadable file or
//! a single dead category degrades to a warning and an empty slice; the
//! merged fetch fails only when every category failed. A repository with
//! a missing `books/` directory still yields projects and writing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use futures::{stream, StreamExt};
use log::{info, warn};
use serde::Serialize;

use crate::config::CategoriesConfig;
use crate::models::{Category, ContentItem};
use crate::normalize::normalize_document;
use crate::source::{self, ContentSource};

/// What one fetch produced.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// All items, newest first.
    pub items: Vec<ContentItem>,
    /// Per-category health, in category order.
    pub outcomes: Vec<CategoryOutcome>,
    /// Monotonic fetch counter, used to reject stale installs downstream.
    pub run: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryOutcome {
    pub category: Category,
    pub dir: String,
    pub count: usize,
    pub error: Option<String>,
}

pub struct Aggregator {
    source: Arc<dyn ContentSource>,
    categories: CategoriesConfig,
    concurrency: usize,
    runs: AtomicU64,
}

impl Aggregator {
    pub fn new(
        source: Arc<dyn ContentSource>,
        categories: CategoriesConfig,
        concurrency: usize,
    ) -> Self {
        Self {
            source,
            categories,
            concurrency,
            runs: AtomicU64::new(0),
        }
    }

    /// Fetch one category directory and normalize its documents.
    ///
    /// Non-document entries are skipped. A file that fails to read or
    /// decode is logged and dropped, as is an outgoing link without a
    /// `url` header; the rest of the category survives.
    pub async fn fetch_category(
        &self,
        category: Category,
    ) -> Result<Vec<ContentItem>, source::SourceError> {
        let dir = self.categories.dir_for(category);
        let entries = self.source.list_dir(dir).await?;

        // Images sit next to their documents. Index them by stem so a
        // document without a header image picks up `<slug>.png`.
        let mut covers: HashMap<String, String> = HashMap::new();
        for entry in entries.iter().filter(|e| source::is_image(e)) {
            let stem = source::file_stem(&entry.name).to_string();
            let location = entry
                .download_url
                .clone()
                .unwrap_or_else(|| entry.path.clone());
            covers.entry(stem).or_insert(location);
        }

        let documents: Vec<_> = entries
            .into_iter()
            .filter(|e| source::is_document(e))
            .collect();

        // `buffered` keeps listing order in the output, so equal-date
        // items land in a stable position run after run.
        let read: Vec<Option<ContentItem>> = stream::iter(documents)
            .map(|entry| {
                let source = Arc::clone(&self.source);
                async move {
                    match source.read_file(&entry.path).await {
                        Ok(raw) => Some(normalize_document(&raw, &entry.name, category)),
                        Err(e) => {
                            warn!("skipping '{}': {}", entry.path, e);
                            None
                        }
                    }
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut items: Vec<ContentItem> = read.into_iter().flatten().collect();

        // A link entry is a pure redirect; without a url there is nothing
        // to redirect to, so the document is dropped like an unreadable one.
        if category == Category::OutgoingLink {
            items.retain(|item| {
                if item.url.is_none() {
                    warn!("skipping link '{}': no url in header", item.slug);
                }
                item.url.is_some()
            });
        }

        for item in items.iter_mut() {
            if item.image.is_none() {
                if let Some(location) = covers.get(&item.slug) {
                    item.image = Some(location.clone());
                }
            }
        }
        Ok(items)
    }

    /// Fetch every category and merge the results into one timeline.
    ///
    /// Categories run concurrently but merge in their fixed order before
    /// the stable date sort, so ties keep a deterministic position. Fails
    /// only when all categories failed.
    pub async fn fetch_all(&self) -> Result<FetchResult> {
        let results = join_all(Category::ALL.iter().map(|&c| self.fetch_category(c))).await;

        let mut items = Vec::new();
        let mut outcomes = Vec::with_capacity(Category::ALL.len());
        for (&category, result) in Category::ALL.iter().zip(results) {
            let dir = self.categories.dir_for(category).to_string();
            match result {
                Ok(batch) => {
                    outcomes.push(CategoryOutcome {
                        category,
                        dir,
                        count: batch.len(),
                        error: None,
                    });
                    items.extend(batch);
                }
                Err(e) => {
                    warn!("category '{}' failed, continuing without it: {}", category, e);
                    outcomes.push(CategoryOutcome {
                        category,
                        dir,
                        count: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        if outcomes.iter().all(|o| o.error.is_some()) {
            let detail = outcomes
                .iter()
                .filter_map(|o| o.error.as_deref())
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("all categories failed: {}", detail);
        }

        let mut items = dedupe(items);
        items.sort_by(|a, b| b.date.cmp(&a.date));

        let run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        info!("run {}: fetched {} items", run, items.len());
        Ok(FetchResult {
            items,
            outcomes,
            run,
        })
    }
}

/// Keep at most one item per (category, slug); the later fetch wins.
fn dedupe(items: Vec<ContentItem>) -> Vec<ContentItem> {
    let mut last: HashMap<(Category, String), usize> = HashMap::new();
    for (i, item) in items.iter().enumerate() {
        last.insert((item.category, item.slug.clone()), i);
    }
    items
        .into_iter()
        .enumerate()
        .filter(|(i, item)| last[&(item.category, item.slug.clone())] == *i)
        .map(|(_, item)| item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNDATED;
    use crate::source::{EntryKind, FileEntry, SourceError};
    use std::collections::HashSet;

    #[derive(Default)]
    struct StubSource {
        listings: HashMap<String, Vec<FileEntry>>,
        files: HashMap<String, String>,
        fail: HashSet<String>,
    }

    impl StubSource {
        fn with_doc(mut self, dir: &str, name: &str, body: &str) -> Self {
            let path = format!("{}/{}", dir, name);
            self.listings
                .entry(dir.to_string())
                .or_default()
                .push(FileEntry {
                    name: name.to_string(),
                    path: path.clone(),
                    kind: EntryKind::File,
                    download_url: None,
                });
            self.files.insert(path, body.to_string());
            self
        }

        fn with_entry(mut self, dir: &str, entry: FileEntry) -> Self {
            self.listings.entry(dir.to_string()).or_default().push(entry);
            self
        }

        fn with_failing_dir(mut self, dir: &str) -> Self {
            self.fail.insert(dir.to_string());
            self
        }
    }

    #[async_trait::async_trait]
    impl ContentSource for StubSource {
        fn label(&self) -> String {
            "stub".to_string()
        }

        async fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, SourceError> {
            if self.fail.contains(path) {
                return Err(SourceError::Unavailable("stub offline".to_string()));
            }
            self.listings
                .get(path)
                .cloned()
                .ok_or_else(|| SourceError::PathNotFound(format!("'{}' does not exist", path)))
        }

        async fn read_file(&self, path: &str) -> Result<String, SourceError> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| SourceError::PathNotFound(format!("'{}' does not exist", path)))
        }
    }

    fn entry(name: &str, dir: &str, kind: EntryKind) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: format!("{}/{}", dir, name),
            kind,
            download_url: None,
        }
    }

    fn doc(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\n\nBody of {}.\n", title, date, title)
    }

    fn aggregator(source: StubSource) -> Aggregator {
        Aggregator::new(Arc::new(source), CategoriesConfig::default(), 4)
    }

    #[tokio::test]
    async fn test_fetch_category_keeps_documents_only() {
        let source = StubSource::default()
            .with_doc("projects", "ditto.mdx", &doc("Ditto", "2024-10-23"))
            .with_entry("projects", entry("readme.txt", "projects", EntryKind::File))
            .with_entry("projects", entry("assets", "projects", EntryKind::Dir));

        let agg = aggregator(source);
        let items = agg.fetch_category(Category::Project).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Ditto");
        assert_eq!(items[0].slug, "ditto");
        assert_eq!(items[0].category, Category::Project);
    }

    #[tokio::test]
    async fn test_fetch_category_skips_unreadable_file() {
        let mut source = StubSource::default()
            .with_doc("projects", "good.mdx", &doc("Good", "2024-01-01"));
        // Listed but unreadable.
        source = source.with_entry("projects", entry("broken.mdx", "projects", EntryKind::File));

        let agg = aggregator(source);
        let items = agg.fetch_category(Category::Project).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].slug, "good");
    }

    #[tokio::test]
    async fn test_sibling_image_becomes_cover() {
        let source = StubSource::default()
            .with_doc("projects", "ditto.mdx", &doc("Ditto", "2024-10-23"))
            .with_entry("projects", entry("ditto.png", "projects", EntryKind::File));

        let agg = aggregator(source);
        let items = agg.fetch_category(Category::Project).await.unwrap();

        assert_eq!(items[0].image.as_deref(), Some("projects/ditto.png"));
    }

    #[tokio::test]
    async fn test_sibling_image_prefers_download_url() {
        let mut asset = entry("ditto.png", "projects", EntryKind::File);
        asset.download_url = Some("https://raw.example.com/ditto.png".to_string());
        let source = StubSource::default()
            .with_doc("projects", "ditto.mdx", &doc("Ditto", "2024-10-23"))
            .with_entry("projects", asset);

        let agg = aggregator(source);
        let items = agg.fetch_category(Category::Project).await.unwrap();

        assert_eq!(
            items[0].image.as_deref(),
            Some("https://raw.example.com/ditto.png")
        );
    }

    #[tokio::test]
    async fn test_header_image_wins_over_sibling() {
        let body = "---\ntitle: Ditto\ndate: 2024-10-23\nimage: https://cdn.example.com/hero.png\n---\n";
        let source = StubSource::default()
            .with_doc("projects", "ditto.mdx", body)
            .with_entry("projects", entry("ditto.png", "projects", EntryKind::File));

        let agg = aggregator(source);
        let items = agg.fetch_category(Category::Project).await.unwrap();

        assert_eq!(
            items[0].image.as_deref(),
            Some("https://cdn.example.com/hero.png")
        );
    }

    #[tokio::test]
    async fn test_link_without_url_is_dropped() {
        let source = StubSource::default()
            .with_doc(
                "links",
                "cool-tool.mdx",
                "---\ntitle: Cool Tool\ndate: 2024-01-15\nurl: https://example.com/tool\n---\n",
            )
            .with_doc("links", "dead-end.mdx", "---\ntitle: Dead End\ndate: 2024-02-01\n---\n");

        let agg = aggregator(source);
        let items = agg.fetch_category(Category::OutgoingLink).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].slug, "cool-tool");
    }

    #[tokio::test]
    async fn test_url_not_required_outside_links() {
        let source = StubSource::default()
            .with_doc("projects", "ditto.mdx", &doc("Ditto", "2024-10-23"));

        let agg = aggregator(source);
        let items = agg.fetch_category(Category::Project).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, None);
    }

    #[tokio::test]
    async fn test_fetch_all_sorts_newest_first() {
        let source = StubSource::default()
            .with_doc("projects", "old.mdx", &doc("Old", "2023-01-01"))
            .with_doc("writing", "new.mdx", &doc("New", "2025-06-15"))
            .with_doc("books", "mid.mdx", &doc("Mid", "2024-03-10"))
            .with_doc(
                "links",
                "undated.mdx",
                "---\ntitle: Undated\nurl: https://example.com/undated\n---\n",
            );

        let agg = aggregator(source);
        let result = agg.fetch_all().await.unwrap();

        let slugs: Vec<&str> = result.items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old", "undated"]);
        assert_eq!(result.items[3].date, UNDATED);
    }

    #[tokio::test]
    async fn test_fetch_all_equal_dates_keep_category_order() {
        let source = StubSource::default()
            .with_doc("writing", "post.mdx", &doc("Post", "2024-05-12"))
            .with_doc("projects", "tool.mdx", &doc("Tool", "2024-05-12"));

        let agg = aggregator(source);
        let result = agg.fetch_all().await.unwrap();

        // Same date: projects merge before writing.
        let slugs: Vec<&str> = result.items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["tool", "post"]);
    }

    #[tokio::test]
    async fn test_fetch_all_degrades_on_category_failure() {
        let source = StubSource::default()
            .with_doc("projects", "ditto.mdx", &doc("Ditto", "2024-10-23"))
            .with_doc("writing", "post.mdx", &doc("Post", "2024-05-12"))
            .with_failing_dir("books");
        // `links` is not listed at all, which degrades the same way.

        let agg = aggregator(source);
        let result = agg.fetch_all().await.unwrap();

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.outcomes.len(), 4);
        let books = &result.outcomes[2];
        assert_eq!(books.category, Category::Book);
        assert!(books.error.is_some());
        assert_eq!(books.count, 0);
        assert!(result.outcomes[3].error.is_some());
        assert!(result.outcomes[0].error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_all_fails_when_every_category_fails() {
        let source = StubSource::default()
            .with_failing_dir("projects")
            .with_failing_dir("writing")
            .with_failing_dir("books")
            .with_failing_dir("links");

        let agg = aggregator(source);
        assert!(agg.fetch_all().await.is_err());
    }

    #[tokio::test]
    async fn test_runs_count_up() {
        let source = StubSource::default().with_doc(
            "projects",
            "ditto.mdx",
            &doc("Ditto", "2024-10-23"),
        );

        let agg = aggregator(source);
        let first = agg.fetch_all().await.unwrap();
        let second = agg.fetch_all().await.unwrap();
        assert_eq!(first.run, 1);
        assert_eq!(second.run, 2);
    }

    #[tokio::test]
    async fn test_duplicate_listing_keeps_last() {
        let source = StubSource::default()
            .with_doc("projects", "dup.mdx", &doc("Dup", "2024-01-01"))
            .with_entry("projects", entry("dup.mdx", "projects", EntryKind::File));

        let agg = aggregator(source);
        let result = agg.fetch_all().await.unwrap();
        assert_eq!(result.items.len(), 1);
    }
}
