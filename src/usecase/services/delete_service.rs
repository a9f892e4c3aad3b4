use tracing::{debug, warn};

use crate::domain::entities::record::FieldAccessor;
use crate::domain::entities::value::Value;
use crate::domain::entities::view::RemovedRow;
use crate::usecase::ports::deleter::{DeleteError, RecordDeleter};
use crate::usecase::services::view_engine::TableEngine;

/// Outcome of a bulk delete. `failed` holds filtered-view indices as they
/// were before any row was removed.
#[derive(Debug)]
pub struct BulkDelete<R> {
    pub removed: Vec<RemovedRow<R>>,
    pub failed: Vec<(usize, DeleteError)>,
}

/// Removes rows from an engine only after the deleter confirms.
///
/// A rejected delete leaves the engine untouched. `DeleteError::NotFound`
/// from the deleter means the backing data no longer holds the record, so
/// the local copy is dropped as well.
pub struct DeleteService<D> {
    deleter: D,
}

impl<D> DeleteService<D> {
    pub fn new(deleter: D) -> Self {
        Self { deleter }
    }

    fn confirm<R>(&self, record: &R) -> Result<(), DeleteError>
    where
        D: RecordDeleter<R>,
    {
        match self.deleter.delete(record) {
            Err(DeleteError::NotFound(what)) => {
                debug!(record = %what, "already gone upstream, dropping local row");
                Ok(())
            }
            other => other,
        }
    }

    /// `Ok(None)` when `index` is stale.
    pub fn delete_at<R, A>(
        &self,
        engine: &mut TableEngine<R, A>,
        index: usize,
    ) -> Result<Option<RemovedRow<R>>, DeleteError>
    where
        D: RecordDeleter<R>,
        A: FieldAccessor<R>,
    {
        let Some(record) = engine.row_at(index) else {
            return Ok(None);
        };
        self.confirm(record)?;
        Ok(engine.remove_row_at(index))
    }

    /// `Ok(None)` when no record carries `id`.
    pub fn delete_by_id<R, A>(
        &self,
        engine: &mut TableEngine<R, A>,
        id: &Value,
    ) -> Result<Option<RemovedRow<R>>, DeleteError>
    where
        D: RecordDeleter<R>,
        A: FieldAccessor<R>,
    {
        let Some(record) = engine.find_by_id(id) else {
            return Ok(None);
        };
        self.confirm(record)?;
        Ok(engine.remove_by_id(id))
    }

    /// Deletes every selected row. Rows the deleter rejects stay in the
    /// engine and stay selected.
    pub fn delete_selected<R, A>(&self, engine: &mut TableEngine<R, A>) -> BulkDelete<R>
    where
        D: RecordDeleter<R>,
        A: FieldAccessor<R>,
    {
        let targets: Vec<usize> = engine.selection().iter().collect();
        let mut confirmed = Vec::with_capacity(targets.len());
        let mut failed = Vec::new();
        for index in targets {
            let Some(record) = engine.row_at(index) else {
                continue;
            };
            match self.confirm(record) {
                Ok(()) => confirmed.push(index),
                Err(err) => {
                    warn!(index, error = %err, "delete rejected, keeping row");
                    failed.push((index, err));
                }
            }
        }

        // Highest index first so lower positions stay valid.
        let mut removed: Vec<RemovedRow<R>> = confirmed
            .into_iter()
            .rev()
            .filter_map(|index| engine.remove_row_at(index))
            .collect();
        removed.reverse();

        BulkDelete { removed, failed }
    }
}
