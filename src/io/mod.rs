// src/io/mod.rs
pub mod export;
pub mod xyz;

use crate::error::{DashboardError, Result};
use crate::model::Molecule;
use std::path::Path;

const BUNDLED_DEFAULT_STRUCTURE: &str = include_str!("../../assets/data/C20-Ih.xyz");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
  Xyz,
}

impl StructureFormat {
  /// Picks the reader from the declared extension of a file name.
  pub fn from_file_name(name: &str) -> Result<Self> {
    let ext = Path::new(name)
      .extension()
      .map(|e| e.to_string_lossy().to_lowercase())
      .unwrap_or_default();

    match ext.as_str() {
      "xyz" | "extxyz" => Ok(StructureFormat::Xyz),
      _ => Err(DashboardError::UnsupportedFormat(if ext.is_empty() {
        name.to_string()
      } else {
        ext
      })),
    }
  }
}

pub fn parse_structure(contents: &str, format: StructureFormat) -> Result<Molecule> {
  match format {
    StructureFormat::Xyz => xyz::parse(contents),
  }
}

/// Decodes uploaded bytes and parses them with the reader matching `file_name`.
pub fn read_upload(file_name: &str, bytes: &[u8]) -> Result<Molecule> {
  let format = StructureFormat::from_file_name(file_name)?;
  let text = std::str::from_utf8(bytes)
    .map_err(|e| DashboardError::parse(0, format!("file is not valid UTF-8: {}", e)))?;
  parse_structure(text, format)
}

pub fn load_structure(path: &Path) -> Result<Molecule> {
  let bytes = std::fs::read(path).map_err(|source| DashboardError::FileRead {
    path: path.to_path_buf(),
    source,
  })?;
  read_upload(&path.to_string_lossy(), &bytes)
}

/// The structure shown before anything is uploaded.
pub fn default_structure(path: Option<&Path>) -> Result<Molecule> {
  match path {
    Some(p) => load_structure(p),
    None => xyz::parse(BUNDLED_DEFAULT_STRUCTURE),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn format_is_chosen_by_extension() {
    assert_eq!(
      StructureFormat::from_file_name("water.XYZ").unwrap(),
      StructureFormat::Xyz
    );
    assert!(matches!(
      StructureFormat::from_file_name("water.cif"),
      Err(DashboardError::UnsupportedFormat(ext)) if ext == "cif"
    ));
    assert!(StructureFormat::from_file_name("POSCAR").is_err());
  }

  #[test]
  fn bundled_default_is_c20() {
    let mol = default_structure(None).unwrap();
    assert_eq!(mol.len(), 20);
    assert!(mol.atoms.iter().all(|a| a.element == "C"));
  }

  #[test]
  fn invalid_utf8_is_a_parse_error() {
    let err = read_upload("bad.xyz", &[0xff, 0xfe, 0x00]).unwrap_err();
    assert!(matches!(err, DashboardError::Parse { line: 0, .. }));
  }

  #[test]
  fn missing_file_reports_path() {
    let err = load_structure(Path::new("/definitely/not/here.xyz")).unwrap_err();
    assert!(matches!(err, DashboardError::FileRead { .. }));
  }
}
