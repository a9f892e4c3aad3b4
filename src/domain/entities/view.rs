use std::cmp::Ordering;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::domain::entities::selection::Selection;
use crate::domain::entities::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Where null (or absent) sort keys land. Applies to both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullOrdering {
    #[default]
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Compares two sort keys. Null placement ignores `direction`.
    pub fn compare(&self, a: &Value, b: &Value, nulls: NullOrdering) -> Ordering {
        let null_first = match nulls {
            NullOrdering::First => Ordering::Less,
            NullOrdering::Last => Ordering::Greater,
        };
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => null_first,
            (false, true) => null_first.reverse(),
            (false, false) => {
                let ordering = a.natural_cmp(b);
                match self.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
        }
    }
}

/// 1-based page position plus page size. `rows_per_page` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageState {
    pub page: usize,
    pub rows_per_page: usize,
}

impl PageState {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            page: 1,
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn total_pages(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.rows_per_page.max(1))
    }

    /// Same state with `page` pulled into `[1, max(1, total_pages)]`.
    pub fn clamped(self, total_rows: usize) -> Self {
        let last_page = self.total_pages(total_rows).max(1);
        Self {
            page: self.page.clamp(1, last_page),
            ..self
        }
    }

    /// Slice bounds of the current page within `total_rows`.
    pub fn range(&self, total_rows: usize) -> Range<usize> {
        let rows_per_page = self.rows_per_page.max(1);
        let start = self
            .page
            .saturating_sub(1)
            .saturating_mul(rows_per_page)
            .min(total_rows);
        let end = start.saturating_add(rows_per_page).min(total_rows);
        start..end
    }
}

/// Snapshot handed to the presentation layer after every mutation.
#[derive(Debug)]
pub struct TableView<'a, R> {
    pub sort: Option<SortSpec>,
    pub search_term: &'a str,
    pub page: usize,
    pub rows_per_page: usize,
    pub selection: &'a Selection,
    pub filtered_rows: Vec<&'a R>,
    pub paged_rows: Vec<&'a R>,
    pub total_pages: usize,
    pub total_rows: usize,
}

impl<R> TableView<'_, R> {
    /// Position of the first paged row inside `filtered_rows`.
    pub fn page_offset(&self) -> usize {
        PageState {
            page: self.page,
            rows_per_page: self.rows_per_page,
        }
        .range(self.total_rows)
        .start
    }

    /// Maps a row position on the current page to its filtered-view index,
    /// the index space selection and removal operate on.
    pub fn filtered_index(&self, page_row: usize) -> Option<usize> {
        (page_row < self.paged_rows.len()).then(|| self.page_offset() + page_row)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(index)
    }

    pub fn all_selected(&self) -> bool {
        self.total_rows > 0 && self.selection.len() == self.total_rows
    }

    pub fn sort_direction_for(&self, field: &str) -> Option<SortDirection> {
        self.sort
            .as_ref()
            .filter(|spec| spec.field == field)
            .map(|spec| spec.direction)
    }
}

/// A record taken out of the engine, returned so the caller can propagate
/// the deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedRow<R> {
    /// Position in the source sequence before removal.
    pub source_index: usize,
    pub record: R,
}
