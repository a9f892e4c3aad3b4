//! Client-side table engine for the HR/payroll dashboard.
//!
//! Every table in the dashboard (employees, payroll runs, leave requests,
//! attendance) hands its raw rows to a [`TableEngine`] and paints whatever
//! [`TableEngine::compute_view`] returns:
//! - free-text search over every scalar field, case-insensitive
//! - single-column stable sort, toggled by header clicks
//! - 1-based pagination, clamped whenever the filtered set shrinks
//! - row selection by filtered-view index, surviving page navigation
//! - removal by position or id, reported back for the deletion collaborator
//!
//! Export renderers consume [`ExportTable`], built from the filtered rows.

pub mod config;
pub mod domain;
pub mod infra;
pub mod usecase;

pub use config::TableConfig;
pub use domain::entities::export::{ExportCell, ExportColumn, ExportFormat, ExportTable};
pub use domain::entities::record::{rows_from_json, FieldAccessor, Fields, Row, RowAccessor};
pub use domain::entities::selection::Selection;
pub use domain::entities::value::Value;
pub use domain::entities::view::{
    NullOrdering, PageState, RemovedRow, SortDirection, SortSpec, TableView,
};
pub use infra::export::csv::CsvExporter;
pub use infra::export::json::JsonExporter;
pub use usecase::ports::deleter::{DeleteError, RecordDeleter};
pub use usecase::ports::exporter::{ExportError, TableExporter};
pub use usecase::services::delete_service::{BulkDelete, DeleteService};
pub use usecase::services::export_service::ExportService;
pub use usecase::services::view_engine::TableEngine;
