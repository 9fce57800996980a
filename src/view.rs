//! Timeline presentation state.
//!
//! [`TimelineView`] owns the last installed fetch, the active query, and
//! the detail selection. Every mutation is guarded: an operation that does
//! not apply in the current state leaves the view untouched and reports
//! `false`, so callers never have to pre-check.

use crate::aggregate::FetchResult;
use crate::models::ContentItem;
use crate::query::{self, Direction, Query};

/// Detail state: the timeline alone, or one item expanded by slug.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Collapsed,
    Expanded(String),
}

pub struct TimelineView {
    items: Vec<ContentItem>,
    run: u64,
    query: Query,
    /// Indices into `items` passing the query, in timeline order.
    visible: Vec<usize>,
    detail: Detail,
}

impl Default for TimelineView {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineView {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            run: 0,
            query: Query::default(),
            visible: Vec::new(),
            detail: Detail::Collapsed,
        }
    }

    /// Install a fetch, replacing the previous items wholesale. A result
    /// whose run is not newer than the installed one is rejected, which
    /// keeps a slow stale fetch from clobbering fresher data.
    pub fn install(&mut self, result: FetchResult) -> bool {
        if result.run <= self.run {
            return false;
        }
        self.items = result.items;
        self.run = result.run;
        self.refresh();
        true
    }

    pub fn set_query(&mut self, query: Query) {
        self.query = query;
        self.refresh();
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn run(&self) -> u64 {
        self.run
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items passing the active query, in timeline order.
    pub fn visible(&self) -> Vec<&ContentItem> {
        self.visible.iter().map(|&i| &self.items[i]).collect()
    }

    pub fn detail(&self) -> &Detail {
        &self.detail
    }

    pub fn expanded(&self) -> Option<&ContentItem> {
        match &self.detail {
            Detail::Expanded(slug) => {
                let pos = self.visible_pos(slug)?;
                Some(&self.items[self.visible[pos]])
            }
            Detail::Collapsed => None,
        }
    }

    /// Expand one visible item. Selecting something the query hides, or a
    /// slug that does not exist, is a rejected no-op.
    pub fn select(&mut self, slug: &str) -> bool {
        if self.visible_pos(slug).is_none() {
            return false;
        }
        self.detail = Detail::Expanded(slug.to_string());
        true
    }

    /// Collapse the detail. A no-op when nothing is expanded.
    pub fn dismiss(&mut self) -> bool {
        if self.detail == Detail::Collapsed {
            return false;
        }
        self.detail = Detail::Collapsed;
        true
    }

    /// What [`TimelineView::step`] would land on, without moving.
    pub fn neighbor(&self, direction: Direction) -> Option<&ContentItem> {
        let slug = match &self.detail {
            Detail::Expanded(slug) => slug,
            Detail::Collapsed => return None,
        };
        let pos = self.visible_pos(slug)?;
        let target = match direction {
            Direction::Prev => pos.checked_sub(1),
            Direction::Next => (pos + 1 < self.visible.len()).then_some(pos + 1),
        };
        target.map(|t| &self.items[self.visible[t]])
    }

    /// Move the expansion to the adjacent visible item. Rejected when
    /// collapsed or already at that end of the timeline.
    pub fn step(&mut self, direction: Direction) -> bool {
        let next = self.neighbor(direction).map(|item| item.slug.clone());
        match next {
            Some(slug) => {
                self.detail = Detail::Expanded(slug);
                true
            }
            None => false,
        }
    }

    fn refresh(&mut self) {
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| query::matches(item, &self.query))
            .map(|(i, _)| i)
            .collect();
        // A selection the new items or query no longer show collapses.
        if let Detail::Expanded(slug) = &self.detail {
            if self.visible_pos(slug).is_none() {
                self.detail = Detail::Collapsed;
            }
        }
    }

    fn visible_pos(&self, slug: &str) -> Option<usize> {
        self.visible
            .iter()
            .position(|&i| self.items[i].slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{TimeZone, Utc};

    fn item(slug: &str, category: Category) -> ContentItem {
        ContentItem {
            title: slug.to_string(),
            description: String::new(),
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            tags: Vec::new(),
            slug: slug.to_string(),
            content: String::new(),
            category,
            category_label: category.tag_name().to_string(),
            url: None,
            image: None,
            rating: None,
        }
    }

    fn result_with(run: u64, items: Vec<ContentItem>) -> FetchResult {
        FetchResult {
            items,
            outcomes: Vec::new(),
            run,
        }
    }

    fn three_item_view() -> TimelineView {
        let mut view = TimelineView::new();
        view.install(result_with(
            1,
            vec![
                item("newest", Category::Project),
                item("middle", Category::Writing),
                item("oldest", Category::Book),
            ],
        ));
        view
    }

    #[test]
    fn test_install_replaces_wholesale() {
        let mut view = three_item_view();
        assert_eq!(view.len(), 3);

        let accepted = view.install(result_with(2, vec![item("only", Category::Project)]));
        assert!(accepted);
        assert_eq!(view.len(), 1);
        assert_eq!(view.visible()[0].slug, "only");
    }

    #[test]
    fn test_install_rejects_stale_run() {
        let mut view = TimelineView::new();
        assert!(view.install(result_with(2, vec![item("fresh", Category::Project)])));

        let accepted = view.install(result_with(1, vec![item("stale", Category::Project)]));
        assert!(!accepted);
        assert_eq!(view.visible()[0].slug, "fresh");
        assert_eq!(view.run(), 2);

        // Same run is stale too.
        assert!(!view.install(result_with(2, Vec::new())));
    }

    #[test]
    fn test_select_requires_visible_item() {
        let mut view = three_item_view();
        assert!(!view.select("missing"));
        assert_eq!(*view.detail(), Detail::Collapsed);

        assert!(view.select("middle"));
        assert_eq!(view.expanded().unwrap().slug, "middle");
    }

    #[test]
    fn test_select_rejected_when_query_hides_item() {
        let mut view = three_item_view();
        view.set_query(Query {
            categories: vec![Category::Project],
            ..Query::default()
        });

        assert!(!view.select("oldest"));
        assert!(view.select("newest"));
    }

    #[test]
    fn test_dismiss_only_when_expanded() {
        let mut view = three_item_view();
        assert!(!view.dismiss());

        view.select("newest");
        assert!(view.dismiss());
        assert_eq!(*view.detail(), Detail::Collapsed);
        assert!(!view.dismiss());
    }

    #[test]
    fn test_step_moves_without_wraparound() {
        let mut view = three_item_view();
        view.select("middle");

        assert!(view.step(Direction::Prev));
        assert_eq!(view.expanded().unwrap().slug, "newest");
        assert!(!view.step(Direction::Prev));
        assert_eq!(view.expanded().unwrap().slug, "newest");

        assert!(view.step(Direction::Next));
        assert!(view.step(Direction::Next));
        assert_eq!(view.expanded().unwrap().slug, "oldest");
        assert!(!view.step(Direction::Next));
    }

    #[test]
    fn test_step_requires_expansion() {
        let mut view = three_item_view();
        assert!(!view.step(Direction::Next));
    }

    #[test]
    fn test_neighbor_peeks_without_moving() {
        let mut view = three_item_view();
        assert!(view.neighbor(Direction::Next).is_none());

        view.select("middle");
        assert_eq!(view.neighbor(Direction::Prev).unwrap().slug, "newest");
        assert_eq!(view.neighbor(Direction::Next).unwrap().slug, "oldest");
        assert_eq!(view.expanded().unwrap().slug, "middle");
    }

    #[test]
    fn test_step_walks_filtered_sequence() {
        let mut view = TimelineView::new();
        view.install(result_with(
            1,
            vec![
                item("p1", Category::Project),
                item("w1", Category::Writing),
                item("p2", Category::Project),
            ],
        ));
        view.set_query(Query {
            categories: vec![Category::Project],
            ..Query::default()
        });

        view.select("p1");
        assert!(view.step(Direction::Next));
        // The writing item in between is invisible to the walk.
        assert_eq!(view.expanded().unwrap().slug, "p2");
    }

    #[test]
    fn test_query_change_collapses_hidden_selection() {
        let mut view = three_item_view();
        view.select("oldest");

        view.set_query(Query {
            categories: vec![Category::Project],
            ..Query::default()
        });
        assert_eq!(*view.detail(), Detail::Collapsed);
    }

    #[test]
    fn test_install_keeps_selection_when_still_present() {
        let mut view = three_item_view();
        view.select("middle");

        view.install(result_with(
            2,
            vec![
                item("middle", Category::Writing),
                item("other", Category::Book),
            ],
        ));
        assert_eq!(view.expanded().unwrap().slug, "middle");

        view.install(result_with(3, vec![item("other", Category::Book)]));
        assert_eq!(*view.detail(), Detail::Collapsed);
    }
}
