use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::info;

use crate::domain::entities::export::{ExportFormat, ExportTable};
use crate::usecase::ports::exporter::{ExportError, TableExporter};

pub struct ExportService {
    exporter: Arc<dyn TableExporter>,
}

impl ExportService {
    pub fn new(exporter: Arc<dyn TableExporter>) -> Self {
        Self { exporter }
    }

    pub fn format(&self) -> ExportFormat {
        self.exporter.format()
    }

    pub fn render(&self, table: &ExportTable) -> Result<Vec<u8>, ExportError> {
        if let Some((row, actual)) = table.ragged_row() {
            return Err(ExportError::RaggedRow {
                row,
                expected: table.headers.len(),
                actual,
            });
        }
        let mut buffer = Vec::new();
        self.exporter.write_table(table, &mut buffer)?;
        Ok(buffer)
    }

    pub fn export_to_path(&self, table: &ExportTable, path: &Path) -> Result<()> {
        let format = self.format();
        let bytes = self
            .render(table)
            .with_context(|| format!("failed to render {} export", format.extension()))?;
        fs::write(path, &bytes)
            .with_context(|| format!("failed to write export: {}", path.display()))?;
        info!(
            path = %path.display(),
            rows = table.row_count(),
            bytes = bytes.len(),
            "table exported"
        );
        Ok(())
    }

    /// `<slug>-<YYYYMMDD>.<ext>`, e.g. `employee-list-20240105.csv`.
    pub fn file_name(&self, title: &str, date: NaiveDate) -> String {
        format!(
            "{}-{}.{}",
            slugify(title),
            date.format("%Y%m%d"),
            self.format().extension()
        )
    }

    pub fn default_file_name(&self, title: &str) -> String {
        self.file_name(title, Local::now().date_naive())
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "export".to_string()
    } else {
        slug.to_string()
    }
}
