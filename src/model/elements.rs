// src/model/elements.rs

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::OnceLock;

const BUNDLED_COLORS: &str = include_str!("../../assets/data/element_colors.json");

static ELEMENT_COLORS: OnceLock<ElementColors> = OnceLock::new();

/// Covalent radius in Angstrom (Cordero et al. 2008).
/// Unknown symbols get 1.50 so that they still bond to close neighbours.
pub fn covalent_radius(element: &str) -> f64 {
  match element {
    // --- Period 1 ---
    "H" => 0.31, "He" => 0.28,
    // --- Period 2 ---
    "Li" => 1.28, "Be" => 0.96, "B" => 0.84, "C" => 0.76, "N" => 0.71, "O" => 0.66, "F" => 0.57,
    "Ne" => 0.58,
    // --- Period 3 ---
    "Na" => 1.66, "Mg" => 1.41, "Al" => 1.21, "Si" => 1.11, "P" => 1.07, "S" => 1.05, "Cl" => 1.02,
    "Ar" => 1.06,
    // --- Period 4 ---
    "K" => 2.03, "Ca" => 1.76, "Sc" => 1.70, "Ti" => 1.60, "V" => 1.53, "Cr" => 1.39, "Mn" => 1.39,
    "Fe" => 1.32, "Co" => 1.26, "Ni" => 1.24, "Cu" => 1.32, "Zn" => 1.22, "Ga" => 1.22,
    "Ge" => 1.20, "As" => 1.19, "Se" => 1.20, "Br" => 1.20, "Kr" => 1.16,
    // --- Period 5 ---
    "Rb" => 2.20, "Sr" => 1.95, "Y" => 1.90, "Zr" => 1.75, "Nb" => 1.64, "Mo" => 1.54,
    "Tc" => 1.47, "Ru" => 1.46, "Rh" => 1.42, "Pd" => 1.39, "Ag" => 1.45, "Cd" => 1.44,
    "In" => 1.42, "Sn" => 1.39, "Sb" => 1.39, "Te" => 1.38, "I" => 1.39, "Xe" => 1.40,
    // --- Period 6 (selected) ---
    "Cs" => 2.44, "Ba" => 2.15, "La" => 2.07, "Hf" => 1.75, "Ta" => 1.70, "W" => 1.62,
    "Re" => 1.51, "Os" => 1.44, "Ir" => 1.41, "Pt" => 1.36, "Au" => 1.36, "Hg" => 1.32,
    "Tl" => 1.45, "Pb" => 1.46, "Bi" => 1.48,
    _ => 1.50,
  }
}

#[derive(Deserialize)]
struct ColorTableFile {
  jmol: HashMap<String, String>,
}

/// Element symbol -> "#RRGGBB" display color.
#[derive(Clone, Debug, Default)]
pub struct ElementColors {
  colors: HashMap<String, String>,
}

impl ElementColors {
  pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
    let file: ColorTableFile = serde_json::from_str(text)?;
    Ok(Self { colors: file.jmol })
  }

  /// The table compiled into the binary.
  pub fn bundled() -> Self {
    Self::from_json(BUNDLED_COLORS).unwrap_or_default()
  }

  /// Loads the table from `path`, falling back to the bundled copy.
  /// Returns the table and a status line for the console.
  pub fn load(path: Option<&Path>) -> (Self, String) {
    let Some(path) = path else {
      return (Self::bundled(), "Using bundled element colors.".to_string());
    };
    match File::open(path) {
      Ok(file) => match serde_json::from_reader::<_, ColorTableFile>(BufReader::new(file)) {
        Ok(table) => {
          let table = Self { colors: table.jmol };
          if table.is_empty() {
            return (
              Self::bundled(),
              format!("No element colors in {:?}, using bundled ones", path),
            );
          }
          let msg = format!("{} element colors loaded from {:?}", table.len(), path);
          (table, msg)
        }
        Err(e) => (
          Self::bundled(),
          format!("Error parsing element colors {:?}: {}", path, e),
        ),
      },
      Err(e) => (
        Self::bundled(),
        format!("Error opening element colors {:?}: {}", path, e),
      ),
    }
  }

  pub fn color(&self, element: &str) -> Option<&str> {
    self.colors.get(element).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.colors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.colors.is_empty()
  }
}

/// Installs the process-wide table. Only the first call has an effect.
pub fn init_element_colors(table: ElementColors) -> bool {
  ELEMENT_COLORS.set(table).is_ok()
}

/// Process-wide table; the bundled copy if nothing was installed.
pub fn element_colors() -> &'static ElementColors {
  ELEMENT_COLORS.get_or_init(ElementColors::bundled)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn bundled_table_has_common_elements() {
    let table = ElementColors::bundled();
    assert_eq!(table.color("H"), Some("#FFFFFF"));
    assert_eq!(table.color("O"), Some("#FF0D0D"));
    assert_eq!(table.color("C"), Some("#909090"));
    assert!(table.color("Xx").is_none());
  }

  #[test]
  fn load_from_file_reads_jmol_section() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r##"{{"jmol": {{"C": "#123456"}}}}"##).unwrap();

    let (table, msg) = ElementColors::load(Some(file.path()));
    assert_eq!(table.color("C"), Some("#123456"));
    assert_eq!(table.len(), 1);
    assert!(msg.contains("loaded"));
  }

  #[test]
  fn broken_file_falls_back_to_bundled() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let (table, msg) = ElementColors::load(Some(file.path()));
    assert_eq!(table.color("O"), Some("#FF0D0D"));
    assert!(msg.contains("Error parsing"));
  }

  #[test]
  fn radii_cover_organic_elements() {
    assert!((covalent_radius("C") - 0.76).abs() < 1e-12);
    assert!((covalent_radius("H") - 0.31).abs() < 1e-12);
    assert!((covalent_radius("Unobtainium") - 1.50).abs() < 1e-12);
  }
}
