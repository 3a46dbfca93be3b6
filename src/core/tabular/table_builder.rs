use serde_json::Value;
use thiserror::Error;

use crate::core::columns::{column_labels, ColumnError};

/// Errors raised while shaping a value grid into a table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("header row {row} is out of range for a grid of {rows} row(s)")]
    HeaderRowOutOfRange { row: usize, rows: usize },
    #[error(transparent)]
    Column(#[from] ColumnError),
}

/// A rectangular view over a fetched value range: one header per column
/// plus the data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SheetTable {
    /// Builds a table from a grid of cell values.
    ///
    /// When `header_row` is given, that row supplies the headers and is
    /// removed from the data; an index past the grid is an error. Otherwise
    /// headers are synthesized as spreadsheet column labels (A, B, C, …)
    /// wide enough for the widest row — ragged rows are common in API
    /// responses because trailing empty cells are omitted.
    pub fn from_values(values: Vec<Vec<Value>>, header_row: Option<usize>) -> Result<Self, TableError> {
        match header_row {
            Some(row_idx) => {
                let headers = values
                    .get(row_idx)
                    .map(|row| row.iter().map(cell_text).collect())
                    .ok_or(TableError::HeaderRowOutOfRange {
                        row: row_idx,
                        rows: values.len(),
                    })?;
                let rows = values
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, row)| (i != row_idx).then_some(row))
                    .collect();
                Ok(Self { headers, rows })
            }
            None => {
                let width = values.iter().map(Vec::len).max().unwrap_or(0);
                let headers = column_labels(width as i64)?;
                Ok(Self {
                    headers,
                    rows: values,
                })
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<Value>> {
        rows.iter()
            .map(|row| row.iter().map(|c| json!(c)).collect())
            .collect()
    }

    #[test]
    fn synthesizes_headers_for_widest_row() {
        let values = grid(&[&["a", "b"], &["c", "d", "e"], &["f"]]);
        let table = SheetTable::from_values(values, None).unwrap();
        assert_eq!(table.headers, vec!["A", "B", "C"]);
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn empty_grid_gets_no_headers() {
        let table = SheetTable::from_values(Vec::new(), None).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn uses_designated_header_row() {
        let values = grid(&[&["name", "count"], &["widget", "3"]]);
        let table = SheetTable::from_values(values, Some(0)).unwrap();
        assert_eq!(table.headers, vec!["name", "count"]);
        assert_eq!(table.rows, grid(&[&["widget", "3"]]));
    }

    #[test]
    fn header_row_may_be_mid_grid() {
        let values = grid(&[&["junk"], &["name"], &["widget"]]);
        let table = SheetTable::from_values(values, Some(1)).unwrap();
        assert_eq!(table.headers, vec!["name"]);
        assert_eq!(table.rows, grid(&[&["junk"], &["widget"]]));
    }

    #[test]
    fn out_of_range_header_row_is_an_error() {
        let values = grid(&[&["a"], &["b"]]);
        assert_eq!(
            SheetTable::from_values(values, Some(5)),
            Err(TableError::HeaderRowOutOfRange { row: 5, rows: 2 })
        );
    }

    #[test]
    fn non_string_header_cells_are_stringified() {
        let values = vec![vec![json!(42), json!("label")], vec![json!("x"), json!("y")]];
        let table = SheetTable::from_values(values, Some(0)).unwrap();
        assert_eq!(table.headers, vec!["42", "label"]);
    }
}
