// src/dashboard/table.rs

use crate::error::{DashboardError, Result};
use crate::model::{CellValue, Column, RecordSet};

pub const DISPLAY_DECIMALS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
  AsIs,
  Fixed(usize),
}

/// Column metadata for the data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumn {
  pub column: Column,
  pub format: CellFormat,
  pub editable: bool,
}

impl TableColumn {
  pub fn for_column(column: Column) -> Self {
    let format = if column.is_scalar() && column != Column::Custom {
      CellFormat::Fixed(DISPLAY_DECIMALS)
    } else {
      CellFormat::AsIs
    };
    Self {
      column,
      format,
      editable: column == Column::Custom,
    }
  }
}

/// Row projection of the record set restricted to the chosen columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
  pub columns: Vec<TableColumn>,
  pub rows: Vec<Vec<CellValue>>,
}

impl TableView {
  pub fn is_empty(&self) -> bool {
    self.columns.is_empty() || self.rows.is_empty()
  }

  pub fn display_text(&self, row: usize, col: usize) -> String {
    let cell = &self.rows[row][col];
    match self.columns[col].format {
      CellFormat::AsIs => cell.raw_text(),
      CellFormat::Fixed(d) => cell.fixed_text(d),
    }
  }

  /// Current contents as the payload sent back after an edit.
  pub fn payload(&self) -> TablePayload {
    TablePayload {
      columns: self.columns.iter().map(|c| c.column).collect(),
      rows: self
        .rows
        .iter()
        .map(|row| row.iter().map(CellValue::raw_text).collect())
        .collect(),
    }
  }
}

pub fn select_columns(records: Option<&RecordSet>, columns: &[Column]) -> TableView {
  let Some(records) = records else {
    return TableView::default();
  };
  if columns.is_empty() {
    return TableView::default();
  }

  TableView {
    columns: columns.iter().map(|&c| TableColumn::for_column(c)).collect(),
    rows: records
      .rows()
      .iter()
      .map(|r| columns.iter().map(|&c| r.cell(c)).collect())
      .collect(),
  }
}

/// Table contents as text, aligned with the record set by row position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePayload {
  pub columns: Vec<Column>,
  pub rows: Vec<Vec<String>>,
}

impl TablePayload {
  /// Replaces one cell; false if the position or column is not in the payload.
  pub fn set(&mut self, row: usize, column: Column, text: &str) -> bool {
    let Some(col) = self.columns.iter().position(|&c| c == column) else {
      return false;
    };
    match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
      Some(cell) => {
        *cell = text.to_string();
        true
      }
      None => false,
    }
  }
}

fn coerce(text: &str, column: Column, row: usize) -> Result<f64> {
  let t = text.trim();
  if t.is_empty() {
    return Ok(f64::NAN);
  }
  // "inf" and "NaN" parse as f64 but are not data; blank is the only missing value
  t.parse::<f64>()
    .ok()
    .filter(|v| v.is_finite())
    .ok_or_else(|| DashboardError::Coercion {
      column: column.name().to_string(),
      row,
      value: text.to_string(),
    })
}

/// Overlays the scalar columns of `payload` onto a copy of `records`.
///
/// Identity and coordinate columns in the payload are ignored. All values are
/// coerced before anything is written, so a bad cell leaves no partial edit.
pub fn apply_table_edit(records: &RecordSet, payload: &TablePayload) -> Result<RecordSet> {
  let writable: Vec<(usize, Column)> = payload
    .columns
    .iter()
    .copied()
    .enumerate()
    .filter(|(_, c)| c.is_scalar())
    .collect();

  let mut updates = Vec::new();
  for (row_idx, row) in payload.rows.iter().enumerate().take(records.len()) {
    for &(col_idx, column) in &writable {
      if let Some(text) = row.get(col_idx) {
        updates.push((row_idx, column, coerce(text, column, row_idx)?));
      }
    }
  }

  let mut edited = records.clone();
  let rows = edited.rows_mut();
  for (row_idx, column, value) in updates {
    if let Some(slot) = rows[row_idx].scalar_mut(column) {
      *slot = value;
    }
  }
  Ok(edited)
}
