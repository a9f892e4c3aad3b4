use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::entities::export::{ExportFormat, ExportTable};
use crate::usecase::ports::exporter::{ExportError, TableExporter};

/// RFC 4180 output: header row first, CRLF line endings, fields quoted only
/// when they contain the delimiter, a quote or a line break. The title is
/// not part of the CSV body.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn write_table(&self, table: &ExportTable, out: &mut dyn Write) -> Result<(), ExportError> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .from_writer(out);

        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}
