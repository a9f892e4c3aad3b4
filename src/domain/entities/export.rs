use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entities::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// One exported cell: `string | number | boolean | null`.
///
/// Integers keep their own variant so they render as `25`, not `25.0`, and
/// ids beyond 2^53 survive unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportCell {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl From<&Value> for ExportCell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ExportCell::Null,
            Value::Bool(flag) => ExportCell::Bool(*flag),
            Value::Int(number) => ExportCell::Integer(*number),
            Value::Float(number) => ExportCell::Number(*number),
            Value::Text(text) => ExportCell::Text(text.clone()),
            other => ExportCell::Text(other.to_string()),
        }
    }
}

impl fmt::Display for ExportCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportCell::Null => Ok(()),
            ExportCell::Bool(flag) => write!(f, "{flag}"),
            ExportCell::Integer(number) => write!(f, "{number}"),
            ExportCell::Number(number) => write!(f, "{number}"),
            ExportCell::Text(text) => f.write_str(text),
        }
    }
}

/// Header label plus the record field it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumn {
    pub header: String,
    pub field: String,
}

impl ExportColumn {
    pub fn new(header: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            field: field.into(),
        }
    }
}

/// Normalized table handed to CSV/XLSX/PDF renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ExportCell>>,
}

impl ExportTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            title: None,
            headers,
            rows: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First row whose width differs from the header, as
    /// `(row, actual width)`.
    pub fn ragged_row(&self) -> Option<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.headers.len())
            .map(|(idx, row)| (idx, row.len()))
    }
}
