//! List page engine: category filtering, column sorting, page slicing.
//!
//! The engine is pure. It holds the full fetched document set and a
//! [`ListState`] describing the user's current filter/sort/page selection;
//! every view of the data is recomputed from those two. Title filtering is
//! the one exception: it happens server-side through the list API's title
//! parameter, so the engine never re-filters titles locally.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use crate::models::{find_category, Document};

/// Rows per page.
pub const PAGE_SIZE: usize = 10;
/// Maximum number of page buttons shown at once.
pub const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Type,
    Date,
    Title,
    EndDate,
}

impl SortField {
    pub fn as_param(self) -> &'static str {
        match self {
            SortField::Type => "type",
            SortField::Date => "date",
            SortField::Title => "title",
            SortField::EndDate => "endDate",
        }
    }

    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "type" => Some(SortField::Type),
            "date" => Some(SortField::Date),
            "title" => Some(SortField::Title),
            "endDate" => Some(SortField::EndDate),
            _ => None,
        }
    }

    fn key<'a>(self, document: &'a Document) -> &'a str {
        match self {
            SortField::Type => &document.doc_type,
            SortField::Date => &document.date,
            SortField::Title => &document.title,
            SortField::EndDate => &document.end_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// The user's current selection on the list page. Serializable to a query
/// string so every link on the page encodes the state it leads to.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    /// Exclusive top-level category id.
    pub top_category: Option<String>,
    /// Additive sub-category ids under the active top category.
    pub checked_subs: Vec<String>,
    pub sort: Option<(SortField, SortOrder)>,
    /// 1-based.
    pub page: usize,
    /// Server-side title filter, echoed through links so it survives
    /// sorting and paging.
    pub title_filter: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            top_category: Some("maker".to_string()),
            checked_subs: Vec::new(),
            sort: None,
            page: 1,
            title_filter: None,
        }
    }
}

impl ListState {
    /// Activate a top-level category. Exclusive, so the checked subs of
    /// the previous one are dropped. Filter change resets to page 1.
    pub fn select_top(&mut self, id: &str) {
        self.top_category = Some(id.to_string());
        self.checked_subs.clear();
        self.page = 1;
    }

    /// Check or uncheck a sub-category box. Filter change resets to
    /// page 1.
    pub fn toggle_sub(&mut self, id: &str) {
        if let Some(pos) = self.checked_subs.iter().position(|s| s == id) {
            self.checked_subs.remove(pos);
        } else {
            self.checked_subs.push(id.to_string());
        }
        self.page = 1;
    }

    /// Click a column header: same column flips the order, a different
    /// column starts ascending.
    pub fn sort_by(&mut self, field: SortField) {
        self.sort = match self.sort {
            Some((active, order)) if active == field => Some((field, order.flipped())),
            _ => Some((field, SortOrder::Asc)),
        };
    }

    /// Encode as a list-page query string.
    pub fn to_query(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(ref top) = self.top_category {
            serializer.append_pair("top", top);
        }
        for sub in &self.checked_subs {
            serializer.append_pair("sub", sub);
        }
        if let Some((field, order)) = self.sort {
            serializer.append_pair("sort", field.as_param());
            serializer.append_pair("order", order.as_param());
        }
        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        if let Some(ref title) = self.title_filter {
            if !title.is_empty() {
                serializer.append_pair("title", title);
            }
        }
        serializer.finish()
    }
}

/// Locale-aware stand-in comparator: compare NFKC-normalized forms so
/// width variants (full-width vs half-width) order together.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.nfkc().cmp(b.nfkc())
}

/// The full fetched set plus the current selection.
pub struct ListEngine {
    documents: Vec<Document>,
    pub state: ListState,
}

impl ListEngine {
    pub fn new(documents: Vec<Document>, state: ListState) -> Self {
        Self { documents, state }
    }

    /// Category filter then sort, over the whole set.
    pub fn filtered(&self) -> Vec<&Document> {
        let mut rows: Vec<&Document> = self
            .documents
            .iter()
            .filter(|doc| self.matches_filters(doc))
            .collect();

        if let Some((field, order)) = self.state.sort {
            rows.sort_by(|a, b| {
                let cmp = locale_cmp(field.key(a), field.key(b));
                match order {
                    SortOrder::Asc => cmp,
                    SortOrder::Desc => cmp.reverse(),
                }
            });
        }
        rows
    }

    fn matches_filters(&self, document: &Document) -> bool {
        if let Some(ref top_id) = self.state.top_category {
            match find_category(top_id) {
                Some(top) if top.matches_type(&document.doc_type) => {}
                _ => return false,
            }
        }
        if self.state.checked_subs.is_empty() {
            return true;
        }
        self.state.checked_subs.iter().any(|sub_id| {
            find_category(sub_id)
                .map(|sub| document.doc_type.contains(sub.name))
                .unwrap_or(false)
        })
    }

    pub fn total_filtered(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_pages(&self) -> usize {
        self.total_filtered().div_ceil(PAGE_SIZE)
    }

    /// The rows of the current page.
    pub fn page_slice(&self) -> Vec<&Document> {
        let rows = self.filtered();
        let start = (self.state.page - 1) * PAGE_SIZE;
        rows.into_iter().skip(start).take(PAGE_SIZE).collect()
    }

    /// Jump to a page. Out-of-range requests are no-ops.
    pub fn set_page(&mut self, page: usize) {
        if page >= 1 && page <= self.total_pages() {
            self.state.page = page;
        }
    }

    /// Page numbers to render as buttons: a window of up to
    /// [`PAGE_WINDOW`] pages centered on the current page, clamped to the
    /// valid range.
    pub fn page_window(&self) -> Vec<usize> {
        let total = self.total_pages();
        if total == 0 {
            return Vec::new();
        }
        let mut start = self.state.page.saturating_sub(PAGE_WINDOW / 2).max(1);
        let end = (start + PAGE_WINDOW - 1).min(total);
        start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
        (start..=end).collect()
    }

    /// 1-based inclusive bounds of the current page for the "x件〜y件 /
    /// 全n件" summary line. `None` when nothing matched.
    pub fn result_range(&self) -> Option<(usize, usize)> {
        let total = self.total_filtered();
        if total == 0 {
            return None;
        }
        let first = (self.state.page - 1) * PAGE_SIZE + 1;
        let last = (self.state.page * PAGE_SIZE).min(total);
        Some((first, last))
    }

    /// Drop a row from local state. Called only after the API delete
    /// succeeded. Clamps the page if the last row of the last page went
    /// away.
    pub fn remove_document(&mut self, id: &str) {
        self.documents.retain(|doc| doc.id != id);
        let total = self.total_pages();
        if total > 0 && self.state.page > total {
            self.state.page = total;
        }
    }
}
