// src/io/export.rs

use crate::dashboard::table::TableView;
use crate::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the displayed table as CSV: one header row, one row per atom,
/// values at full precision (display rounding is not applied).
pub fn write_csv<W: Write>(table: &TableView, writer: W) -> Result<()> {
  let mut wtr = csv::Writer::from_writer(writer);

  wtr.write_record(table.columns.iter().map(|c| c.column.name()))?;
  for row in &table.rows {
    wtr.write_record(row.iter().map(|cell| cell.raw_text()))?;
  }
  wtr.flush()?;
  Ok(())
}

pub fn export_csv(table: &TableView, path: &Path) -> Result<()> {
  let file = File::create(path)?;
  write_csv(table, file)?;
  log::info!("Table exported to {:?} ({} rows)", path, table.rows.len());
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dashboard::table::select_columns;
  use crate::model::{AtomRecord, Column, RecordSet};

  fn records() -> RecordSet {
    let mut o = AtomRecord::bare(0, "O", [0.0, 0.0, 0.0]);
    o.pyr_a = 12.5;
    let h = AtomRecord::bare(1, "H", [1.0, 0.0, 0.0]);
    RecordSet::new(vec![o, h])
  }

  #[test]
  fn csv_has_header_and_one_row_per_atom() {
    let table = select_columns(
      Some(&records()),
      &[Column::AtomIdx, Column::Species, Column::PyrA],
    );
    let mut buf = Vec::new();
    write_csv(&table, &mut buf).unwrap();

    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["atom_idx,species,pyrA", "0,O,12.5", "1,H,"]);
  }

  #[test]
  fn coordinates_are_quoted() {
    let table = select_columns(Some(&records()), &[Column::AtomA]);
    let mut buf = Vec::new();
    write_csv(&table, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("\"[1, 0, 0]\""));
  }

  #[test]
  fn export_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.csv");
    let table = select_columns(Some(&records()), &[Column::Custom]);

    export_csv(&table, &path).unwrap();

    let content = std::fs::read_to_string(path).unwrap();
    assert_eq!(content, "custom\n0\n0\n");
  }
}
