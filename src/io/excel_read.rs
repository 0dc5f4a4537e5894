use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{ReportError, Result};
use crate::model::{Cell, Frame};

/// Reads the first worksheet of a workbook into a [`Frame`]. Row zero is the
/// header; rows are padded with empty cells to the header width.
pub fn read_frame(path: &Path, name: &str) -> Result<Frame> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReportError::InvalidWorkbook(format!("workbook '{name}' has no sheets")))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| {
            ReportError::InvalidWorkbook(format!("missing sheet '{sheet_name}' in '{name}'"))
        })?
        .map_err(ReportError::from)?;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|cell| cell_to_string(Some(cell))).collect(),
        None => Vec::new(),
    };

    if columns.is_empty() {
        return Err(ReportError::InvalidWorkbook(format!(
            "workbook '{name}' has no header row"
        )));
    }

    let width = columns.len();
    let data = rows
        .map(|row| {
            let mut cells: Vec<Cell> = row.iter().map(convert_cell).collect();
            cells.resize(width, Cell::Empty);
            cells
        })
        .collect();

    Ok(Frame::new(name, columns, data))
}

fn convert_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::DateTime(value) => Cell::DateTime(*value),
        DataType::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
