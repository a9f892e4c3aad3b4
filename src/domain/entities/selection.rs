use std::collections::{BTreeSet, HashSet};
use std::ops::Range;

use serde::Serialize;

/// Row positions in the current filtered and sorted view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    indices: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            indices: range.collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Ascending view positions.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Returns whether `index` is selected afterwards.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.indices.remove(&index) {
            false
        } else {
            self.indices.insert(index);
            true
        }
    }

    pub fn insert_range(&mut self, range: Range<usize>) {
        self.indices.extend(range);
    }

    pub fn remove_range(&mut self, range: Range<usize>) {
        for index in range {
            self.indices.remove(&index);
        }
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Drops `removed` and shifts every later position down by one.
    pub fn shift_after_removal(&mut self, removed: usize) {
        self.indices = self
            .indices
            .iter()
            .filter(|&&index| index != removed)
            .map(|&index| if index > removed { index - 1 } else { index })
            .collect();
    }

    /// Re-expresses the selection after the view order changed.
    ///
    /// `before` and `after` map view positions to source positions for the
    /// old and new order.
    pub fn remap(&mut self, before: &[usize], after: &[usize]) {
        let selected_sources: HashSet<usize> = self
            .indices
            .iter()
            .filter_map(|&index| before.get(index).copied())
            .collect();
        self.indices = after
            .iter()
            .enumerate()
            .filter(|(_, source)| selected_sources.contains(source))
            .map(|(index, _)| index)
            .collect();
    }
}
