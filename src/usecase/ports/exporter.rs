use std::io::Write;

use crate::domain::entities::export::{ExportFormat, ExportTable};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Renders the normalized export table into a byte stream.
pub trait TableExporter: Send + Sync {
    fn format(&self) -> ExportFormat;
    fn write_table(&self, table: &ExportTable, out: &mut dyn Write) -> Result<(), ExportError>;
}
