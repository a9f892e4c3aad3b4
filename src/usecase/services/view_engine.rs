use std::collections::{BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::config::TableConfig;
use crate::domain::entities::export::{ExportCell, ExportColumn, ExportTable};
use crate::domain::entities::record::FieldAccessor;
use crate::domain::entities::selection::Selection;
use crate::domain::entities::value::Value;
use crate::domain::entities::view::{NullOrdering, PageState, RemovedRow, SortSpec, TableView};

/// Client-side table state: search, sort, paging and row selection over a
/// snapshot of records.
///
/// Every mutating call leaves the engine in a state from which
/// [`compute_view`](Self::compute_view) can be called. Invalid input is
/// corrected or ignored, never reported as an error.
///
/// Selection and removal indices refer to positions in the filtered and
/// sorted sequence, independent of the current page.
#[derive(Debug)]
pub struct TableEngine<R, A> {
    rows: Vec<R>,
    accessor: A,
    sort: Option<SortSpec>,
    search_term: String,
    page: PageState,
    selection: Selection,
    null_ordering: NullOrdering,
    id_field: String,
}

impl<R, A: FieldAccessor<R>> TableEngine<R, A> {
    pub fn new(rows: Vec<R>, accessor: A, config: &TableConfig) -> Self {
        Self {
            rows,
            accessor,
            sort: None,
            search_term: String::new(),
            page: PageState::new(config.effective_rows_per_page()),
            selection: Selection::new(),
            null_ordering: config.null_ordering,
            id_field: config.id_field.clone(),
        }
    }

    pub fn with_defaults(rows: Vec<R>, accessor: A) -> Self {
        Self::new(rows, accessor, &TableConfig::default())
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Stored page. May exceed the last page until the next clamp.
    pub fn page(&self) -> usize {
        self.page.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.page.rows_per_page
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Installs a fresh source snapshot. Positional selection cannot
    /// survive it and is cleared.
    pub fn replace_rows(&mut self, rows: Vec<R>) {
        debug!(rows = rows.len(), "replacing source rows");
        self.rows = rows;
        self.selection.clear();
        self.clamp_page();
    }

    /// Sets the free-text filter, returns to page 1 and clears the selection.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page.page = 1;
        if !self.selection.is_empty() {
            debug!(
                cleared = self.selection.len(),
                "search changed, clearing selection"
            );
            self.selection.clear();
        }
    }

    pub fn clear_search(&mut self) {
        self.set_search_term(String::new());
    }

    /// Sorts by `field`, flipping the direction when it is already active.
    ///
    /// The page is kept. Selected rows stay selected at their new positions.
    pub fn request_sort(&mut self, field: &str) {
        let before = self.ordered_indices();
        let next = match self.sort.take() {
            Some(active) if active.field == field => SortSpec {
                direction: active.direction.flipped(),
                ..active
            },
            _ => SortSpec::ascending(field),
        };
        debug!(field, direction = ?next.direction, "sort requested");
        self.sort = Some(next);
        self.remap_selection(&before);
    }

    /// Returns to insertion order.
    pub fn clear_sort(&mut self) {
        if self.sort.is_none() {
            return;
        }
        let before = self.ordered_indices();
        self.sort = None;
        self.remap_selection(&before);
    }

    /// Stores `page` (1-based). Zero becomes 1; the upper bound is applied
    /// when the view is derived.
    pub fn set_page(&mut self, page: usize) {
        self.page.page = page.max(1);
    }

    /// Changes the page size and returns to page 1. Zero is ignored.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        if rows_per_page == 0 {
            debug!("ignoring zero rows per page");
            return;
        }
        self.page.rows_per_page = rows_per_page;
        self.page.page = 1;
    }

    pub fn next_page(&mut self) {
        let total_rows = self.filtered_len();
        let current = self.page.clamped(total_rows);
        let last_page = current.total_pages(total_rows).max(1);
        self.page = PageState {
            page: (current.page + 1).min(last_page),
            ..current
        };
    }

    pub fn previous_page(&mut self) {
        let current = self.page.clamped(self.filtered_len());
        self.page = PageState {
            page: current.page.saturating_sub(1).max(1),
            ..current
        };
    }

    /// Flips selection of the row at `index` in the filtered view.
    /// Out-of-range indices are ignored.
    pub fn toggle_row_selection(&mut self, index: usize) {
        let total_rows = self.filtered_len();
        if index >= total_rows {
            debug!(index, total_rows, "ignoring selection toggle out of range");
            return;
        }
        let selected = self.selection.toggle(index);
        trace!(index, selected, "row selection toggled");
    }

    /// Selects every filtered row, or none.
    pub fn select_all(&mut self, checked: bool) {
        self.selection = if checked {
            Selection::from_range(0..self.filtered_len())
        } else {
            Selection::new()
        };
    }

    /// Adds or removes the rows of the current page.
    pub fn select_page(&mut self, checked: bool) {
        let total_rows = self.filtered_len();
        let range = self.page.clamped(total_rows).range(total_rows);
        if checked {
            self.selection.insert_range(range);
        } else {
            self.selection.remove_range(range);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(index)
    }

    /// Selected records in view order.
    pub fn selected_rows(&self) -> Vec<&R> {
        let order = self.ordered_indices();
        self.selection
            .iter()
            .filter_map(|index| order.get(index))
            .map(|&source| &self.rows[source])
            .collect()
    }

    /// Record at `index` in the filtered view.
    pub fn row_at(&self, index: usize) -> Option<&R> {
        self.ordered_indices()
            .get(index)
            .map(|&source| &self.rows[source])
    }

    /// First record whose id field equals `id`. A null id matches nothing.
    pub fn find_by_id(&self, id: &Value) -> Option<&R> {
        self.source_index_of(id).map(|source| &self.rows[source])
    }

    /// Removes the row at `index` in the filtered view.
    ///
    /// Returns `None` for a stale index, leaving everything untouched.
    pub fn remove_row_at(&mut self, index: usize) -> Option<RemovedRow<R>> {
        let order = self.ordered_indices();
        let Some(&source_index) = order.get(index) else {
            debug!(index, total_rows = order.len(), "remove ignored stale index");
            return None;
        };
        let record = self.rows.remove(source_index);
        self.selection.shift_after_removal(index);
        self.clamp_page();
        debug!(index, source_index, "row removed");
        Some(RemovedRow {
            source_index,
            record,
        })
    }

    /// Removes the first record whose id field equals `id`.
    pub fn remove_by_id(&mut self, id: &Value) -> Option<RemovedRow<R>> {
        let Some(source_index) = self.source_index_of(id) else {
            debug!(id = %id, field = %self.id_field, "remove ignored unknown id");
            return None;
        };
        let view_index = self
            .ordered_indices()
            .iter()
            .position(|&source| source == source_index);
        let record = self.rows.remove(source_index);
        if let Some(view_index) = view_index {
            self.selection.shift_after_removal(view_index);
        }
        self.clamp_page();
        debug!(id = %id, source_index, "row removed by id");
        Some(RemovedRow {
            source_index,
            record,
        })
    }

    /// Removes every selected row, returned in view order.
    pub fn remove_selected(&mut self) -> Vec<RemovedRow<R>> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let order = self.ordered_indices();
        let targets: Vec<usize> = self
            .selection
            .iter()
            .filter_map(|index| order.get(index).copied())
            .collect();
        let doomed: BTreeSet<usize> = targets.iter().copied().collect();

        let mut removed = HashMap::with_capacity(doomed.len());
        let mut kept = Vec::with_capacity(self.rows.len() - doomed.len());
        let rows = std::mem::take(&mut self.rows);
        for (source_index, record) in rows.into_iter().enumerate() {
            if doomed.contains(&source_index) {
                removed.insert(source_index, record);
            } else {
                kept.push(record);
            }
        }
        self.rows = kept;
        self.selection.clear();
        self.clamp_page();
        debug!(removed = removed.len(), "selected rows removed");

        targets
            .into_iter()
            .filter_map(|source_index| {
                removed.remove(&source_index).map(|record| RemovedRow {
                    source_index,
                    record,
                })
            })
            .collect()
    }

    /// Derives the filtered, sorted and paged view.
    pub fn compute_view(&self) -> TableView<'_, R> {
        let filtered_rows: Vec<&R> = self
            .ordered_indices()
            .into_iter()
            .map(|source| &self.rows[source])
            .collect();
        let total_rows = filtered_rows.len();
        let page = self.page.clamped(total_rows);
        let paged_rows = filtered_rows[page.range(total_rows)].to_vec();

        TableView {
            sort: self.sort.clone(),
            search_term: &self.search_term,
            page: page.page,
            rows_per_page: page.rows_per_page,
            selection: &self.selection,
            total_pages: page.total_pages(total_rows),
            total_rows,
            filtered_rows,
            paged_rows,
        }
    }

    /// Builds the export contract from every filtered row, not just the
    /// current page.
    pub fn export_table(&self, columns: &[ExportColumn], title: Option<&str>) -> ExportTable {
        let headers = columns.iter().map(|column| column.header.clone()).collect();
        let mut table = ExportTable::new(headers);
        table.title = title.map(str::to_string);
        table.rows = self
            .ordered_indices()
            .into_iter()
            .map(|source| {
                let record = &self.rows[source];
                columns
                    .iter()
                    .map(|column| {
                        ExportCell::from(&self.accessor.value(record, &column.field))
                    })
                    .collect()
            })
            .collect();
        table
    }

    fn source_index_of(&self, id: &Value) -> Option<usize> {
        if id.is_null() {
            return None;
        }
        self.rows.iter().position(|record| {
            self.accessor
                .value(record, &self.id_field)
                .natural_cmp(id)
                .is_eq()
        })
    }

    /// Lowercased term, matched verbatim. Only the empty term disables
    /// filtering.
    fn search_needle(&self) -> Option<String> {
        (!self.search_term.is_empty()).then(|| self.search_term.to_lowercase())
    }

    /// Source positions of rows matching the search term, insertion order.
    fn filtered_indices(&self) -> Vec<usize> {
        match self.search_needle() {
            Some(needle) => (0..self.rows.len())
                .filter(|&source| self.accessor.matches(&self.rows[source], &needle))
                .collect(),
            None => (0..self.rows.len()).collect(),
        }
    }

    fn filtered_len(&self) -> usize {
        match self.search_needle() {
            Some(needle) => self
                .rows
                .iter()
                .filter(|record| self.accessor.matches(record, &needle))
                .count(),
            None => self.rows.len(),
        }
    }

    /// Source positions in view order: filtered, then stably sorted.
    fn ordered_indices(&self) -> Vec<usize> {
        let filtered = self.filtered_indices();
        let Some(spec) = &self.sort else {
            return filtered;
        };

        let keys: Vec<Value> = filtered
            .iter()
            .map(|&source| self.accessor.value(&self.rows[source], &spec.field))
            .collect();
        let mut positions: Vec<usize> = (0..filtered.len()).collect();
        positions.sort_by(|&a, &b| spec.compare(&keys[a], &keys[b], self.null_ordering));
        positions.into_iter().map(|position| filtered[position]).collect()
    }

    fn remap_selection(&mut self, before: &[usize]) {
        if self.selection.is_empty() {
            return;
        }
        let after = self.ordered_indices();
        self.selection.remap(before, &after);
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamped(self.filtered_len());
    }
}
