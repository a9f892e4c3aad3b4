use std::io::Write;

use crate::domain::entities::export::{ExportFormat, ExportTable};
use crate::usecase::ports::exporter::{ExportError, TableExporter};

/// Writes the export contract itself as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl TableExporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn write_table(&self, table: &ExportTable, out: &mut dyn Write) -> Result<(), ExportError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, table)?;
        } else {
            serde_json::to_writer(&mut *out, table)?;
        }
        out.flush()?;
        Ok(())
    }
}
