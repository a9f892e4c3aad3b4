use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::entities::view::NullOrdering;

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;
pub const DEFAULT_ID_FIELD: &str = "id";

/// Construction-time settings for a table engine.
///
/// Missing keys fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub default_rows_per_page: usize,
    /// Choices offered by the page-size dropdown.
    pub rows_per_page_options: Vec<usize>,
    /// Field matched by `remove_by_id`.
    pub id_field: String,
    pub null_ordering: NullOrdering,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_rows_per_page: DEFAULT_ROWS_PER_PAGE,
            rows_per_page_options: vec![5, 10, 25],
            id_field: DEFAULT_ID_FIELD.to_string(),
            null_ordering: NullOrdering::First,
        }
    }
}

impl TableConfig {
    pub fn effective_rows_per_page(&self) -> usize {
        if self.default_rows_per_page == 0 {
            warn!(
                fallback = DEFAULT_ROWS_PER_PAGE,
                "default_rows_per_page is zero, using fallback"
            );
            return DEFAULT_ROWS_PER_PAGE;
        }
        self.default_rows_per_page
    }

    /// Dropdown choices with zeros dropped, sorted and deduplicated.
    pub fn page_size_options(&self) -> Vec<usize> {
        let mut options: Vec<usize> = self
            .rows_per_page_options
            .iter()
            .copied()
            .filter(|size| *size > 0)
            .collect();
        options.sort_unstable();
        options.dedup();
        options
    }
}
