//! Verse list paging and search state.
//!
//! The coordinator tracks what page and filter the navigator is showing; it
//! does not fetch. Callers take `current_query()` to the client, then feed
//! the response back through `apply_page`. After a non-silent save or a
//! review transition the same query is re-fetched so badges and ordering
//! stay current.

use padya_domain::verse::{VerseListItem, VersePage};
pub use padya_domain::verse::ListQuery;

pub const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Debug)]
pub struct VerseListCoordinator {
    items: Vec<VerseListItem>,
    total: u64,
    offset: u64,
    limit: u64,
    query: Option<String>,
    loading: bool,
}

impl Default for VerseListCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl VerseListCoordinator {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
            query: None,
            loading: false,
        }
    }

    pub fn items(&self) -> &[VerseListItem] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The query for the page currently shown; used both for paging and for
    /// reload-in-place after a save or review transition.
    pub fn current_query(&self) -> ListQuery {
        ListQuery {
            offset: self.offset,
            limit: self.limit,
            query: self.query.clone(),
        }
    }

    /// Set or clear the search filter. Any change resets to the first page;
    /// a whitespace-only term clears the filter.
    pub fn search(&mut self, term: &str) -> ListQuery {
        let trimmed = term.trim();
        self.query = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self.offset = 0;
        self.loading = true;
        self.current_query()
    }

    /// Jump to an absolute offset. Clamped below at 0 by the type; not
    /// clamped above — past-the-end pages come back empty and `total` stays
    /// authoritative.
    pub fn page_to(&mut self, offset: u64) -> ListQuery {
        self.offset = offset;
        self.loading = true;
        self.current_query()
    }

    pub fn next_page(&mut self) -> ListQuery {
        self.page_to(self.offset + self.limit)
    }

    pub fn prev_page(&mut self) -> ListQuery {
        self.page_to(self.offset.saturating_sub(self.limit))
    }

    pub fn apply_page(&mut self, page: VersePage) {
        self.items = page.items;
        self.total = page.total;
        self.loading = false;
    }

    /// A fetch that failed; the previous page keeps showing.
    pub fn fetch_failed(&mut self) {
        self.loading = false;
    }

    /// "12–20 of 57, page 2/3" style label for the navigator footer.
    pub fn page_info(&self) -> String {
        if self.total == 0 {
            return "no verses".to_string();
        }
        // A past-the-end offset yields an empty page; don't render an
        // inverted range or a page index beyond the page count.
        if self.items.is_empty() {
            return format!("no verses on this page ({} total)", self.total);
        }
        let start = self.offset + 1;
        let end = self.offset + self.items.len() as u64;
        let page = self.offset / self.limit + 1;
        let pages = self.total.div_ceil(self.limit).max(1);
        format!("{start}\u{2013}{end} of {}, page {page}/{pages}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(count: usize, total: u64) -> VersePage {
        let items = (0..count)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "verse_id": format!("V{i:04}")
                }))
                .unwrap()
            })
            .collect();
        VersePage { items, total }
    }

    #[test]
    fn search_resets_offset() {
        let mut list = VerseListCoordinator::new();
        list.page_to(40);
        let query = list.search("gita");
        assert_eq!(query.offset, 0);
        assert_eq!(query.query.as_deref(), Some("gita"));
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn blank_search_clears_filter() {
        let mut list = VerseListCoordinator::new();
        list.search("gita");
        let query = list.search("   ");
        assert_eq!(query.query, None);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn query_serializes_without_empty_q() {
        let mut list = VerseListCoordinator::new();
        let value = serde_json::to_value(list.current_query()).unwrap();
        assert_eq!(value, serde_json::json!({"offset": 0, "limit": 20}));

        let value = serde_json::to_value(list.search("পদ")).unwrap();
        assert_eq!(value["q"], "পদ");
    }

    #[test]
    fn paging_is_not_clamped_at_the_end() {
        let mut list = VerseListCoordinator::new();
        list.apply_page(page(20, 30));
        let query = list.next_page();
        assert_eq!(query.offset, 20);
        // Well past the end: allowed, server answers with an empty page.
        let query = list.page_to(200);
        assert_eq!(query.offset, 200);
        list.apply_page(page(0, 30));
        assert!(list.items().is_empty());
        assert_eq!(list.total(), 30);
    }

    #[test]
    fn prev_page_saturates_at_zero() {
        let mut list = VerseListCoordinator::new();
        list.page_to(20);
        assert_eq!(list.prev_page().offset, 0);
        assert_eq!(list.prev_page().offset, 0);
    }

    #[test]
    fn reload_keeps_offset_and_query() {
        let mut list = VerseListCoordinator::new();
        list.search("gita");
        list.page_to(20);
        list.apply_page(page(10, 30));
        let reload = list.current_query();
        assert_eq!(reload.offset, 20);
        assert_eq!(reload.query.as_deref(), Some("gita"));
    }

    #[test]
    fn failed_fetch_keeps_previous_page() {
        let mut list = VerseListCoordinator::new();
        list.apply_page(page(20, 57));
        list.page_to(20);
        assert!(list.is_loading());
        list.fetch_failed();
        assert!(!list.is_loading());
        assert_eq!(list.items().len(), 20);
    }

    #[test]
    fn page_info_labels() {
        let mut list = VerseListCoordinator::new();
        assert_eq!(list.page_info(), "no verses");

        list.page_to(20);
        list.apply_page(page(17, 37));
        assert_eq!(list.page_info(), "21\u{2013}37 of 37, page 2/2");
    }

    #[test]
    fn page_info_on_an_empty_past_the_end_page() {
        let mut list = VerseListCoordinator::new();
        list.page_to(200);
        list.apply_page(page(0, 30));
        assert_eq!(list.page_info(), "no verses on this page (30 total)");
    }
}
