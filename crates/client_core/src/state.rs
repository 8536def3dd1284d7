//! Query, page and sort state of one browsing session, and the user events
//! that move it.

use std::fmt;

use shared::{
    domain::SortKey,
    protocol::{ProxyQuery, DEFAULT_PAGE_SIZE},
};

pub const DEFAULT_INITIAL_QUERY: &str = "india";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Submit(String),
    SelectCategory(String),
    ChangeSort(SortKey),
    NextPage,
    PrevPage,
    InitialLoad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Fetch,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.page, self.total_pages)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    page: u32,
    sort_key: SortKey,
    page_size: u32,
    total_results: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_QUERY)
    }
}

impl SearchState {
    pub fn new(initial_query: impl Into<String>) -> Self {
        Self {
            query: initial_query.into(),
            page: 1,
            sort_key: SortKey::default(),
            page_size: DEFAULT_PAGE_SIZE,
            total_results: 0,
        }
    }

    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    pub fn total_pages(&self) -> u32 {
        let pages = self.total_results.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn pagination(&self) -> Pagination {
        let total_pages = self.total_pages();
        Pagination {
            page: self.page,
            total_pages,
            prev_enabled: self.page > 1,
            next_enabled: self.page < total_pages,
        }
    }

    pub fn to_query(&self) -> ProxyQuery {
        ProxyQuery {
            q: self.query.clone(),
            page: self.page,
            sort_by: self.sort_key,
            page_size: self.page_size,
        }
    }

    pub fn apply(&mut self, event: &SearchEvent) -> Transition {
        match event {
            SearchEvent::Submit(input) => {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    return Transition::Ignored;
                }
                self.query = trimmed.to_string();
                self.page = 1;
            }
            SearchEvent::SelectCategory(label) => {
                let category = label.trim().to_lowercase();
                if category.is_empty() {
                    return Transition::Ignored;
                }
                self.query = category;
                self.page = 1;
            }
            SearchEvent::ChangeSort(sort_key) => {
                self.sort_key = *sort_key;
                self.page = 1;
            }
            SearchEvent::NextPage => {
                if self.page >= self.total_pages() {
                    return Transition::Ignored;
                }
                self.page += 1;
            }
            SearchEvent::PrevPage => {
                if self.page <= 1 {
                    return Transition::Ignored;
                }
                self.page -= 1;
            }
            SearchEvent::InitialLoad => {}
        }
        Transition::Fetch
    }

    /// Records the total reported by a successful fetch and pulls the page
    /// back inside the known range. The articles already fetched for the
    /// out-of-range page are not refetched, so the label can point at the
    /// last page while showing what the requested page returned.
    pub fn record_total(&mut self, total_results: u64) {
        self.total_results = total_results;
        let last_page = self.total_pages().max(1);
        self.page = self.page.clamp(1, last_page);
    }

    /// A failed fetch leaves no known total; the page itself is kept.
    pub fn clear_total(&mut self) {
        self.total_results = 0;
    }
}
