//! Worksheet cell values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single non-empty cell as stored in the worksheet.
///
/// Empty cells are represented by `None` at the row level, never by a
/// variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// Shared, inline or formula string
    Text(String),
    /// Number in its stored lexical form (e.g. `"42"`, `"3.5"`)
    Number(String),
    /// Boolean cell
    Bool(bool),
    /// Date-formatted number rendered as `YYYY-MM-DD HH:MM:SS` or `HH:MM:SS`
    Date(String),
    /// Error literal such as `#N/A`
    Error(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) | CellValue::Number(s) | CellValue::Date(s) | CellValue::Error(s) => {
                f.write_str(s)
            }
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// One worksheet row; `None` marks an empty cell.
pub type Row = Vec<Option<CellValue>>;

/// Normalize an optional cell to trimmed text.
///
/// Absent cells become the empty string. Never fails.
pub fn normalize_cell(value: Option<&CellValue>) -> String {
    match value {
        None => String::new(),
        Some(CellValue::Text(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Normalize the cell at `index`, treating out-of-range positions as empty.
pub fn cell_at(row: &[Option<CellValue>], index: usize) -> String {
    normalize_cell(row.get(index).and_then(Option::as_ref))
}
