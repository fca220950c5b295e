// src/config.rs

use crate::analysis::{Colormap, DEFAULT_COLORMAP};
use crate::error::{DashboardError, Result};
use crate::model::Column;
use crate::physics::connectivity::BondCriteria;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub const DEFAULT_TABLE_COLUMNS: [Column; 5] = [
  Column::AtomIdx,
  Column::Species,
  Column::AngularDefect,
  Column::PyrA,
  Column::NStarA,
];

// --- RenderStyle ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
  pub background_color: (f64, f64, f64),
  /// Radius of the atom caps in Angstrom.
  pub atom_radius: f64,
  pub bond_radius: f64,
  pub show_labels: bool,
}

impl Default for RenderStyle {
  fn default() -> Self {
    Self {
      background_color: (1.0, 1.0, 1.0),
      atom_radius: 0.18,
      bond_radius: 0.12,
      show_labels: true,
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
  pub default_colormap: String,
  pub default_bins: usize,
  pub bins_range: (usize, usize),
  pub bond_tolerance: f64,
  pub rcut: f64,
  pub default_table_columns: Vec<Column>,
  pub element_colors_path: Option<PathBuf>,
  pub default_structure_path: Option<PathBuf>,
  pub style: RenderStyle,
}

impl Default for Config {
  fn default() -> Self {
    let criteria = BondCriteria::default();
    Self {
      default_colormap: DEFAULT_COLORMAP.to_string(),
      default_bins: 30,
      bins_range: (5, 50),
      bond_tolerance: criteria.tolerance,
      rcut: criteria.rcut,
      default_table_columns: DEFAULT_TABLE_COLUMNS.to_vec(),
      element_colors_path: None,
      default_structure_path: None,
      style: RenderStyle::default(),
    }
  }
}

impl Config {
  /// Loads config from the standard OS location (e.g. ~/.config/curvview/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  pub fn save(&self) -> String {
    self.save_to(&Self::get_path())
  }

  pub fn load_from(path: &Path) -> (Self, String) {
    if !path.exists() {
      return (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      );
    }
    match File::open(path) {
      Ok(file) => match serde_json::from_reader::<_, Config>(BufReader::new(file)) {
        Ok(cfg) => match cfg.validate() {
          Ok(()) => (cfg.sanitized(), format!("Config loaded from {:?}", path)),
          Err(e) => (Self::default(), format!("{}; using defaults", e)),
        },
        Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
      },
      Err(e) => (Self::default(), format!("Error opening config: {}", e)),
    }
  }

  pub fn save_to(&self, path: &Path) -> String {
    if let Some(parent) = path.parent() {
      let _ = fs::create_dir_all(parent);
    }

    match File::create(path) {
      Ok(file) => match serde_json::to_writer_pretty(BufWriter::new(file), self) {
        Ok(_) => format!("Config saved to {:?}", path),
        Err(e) => format!("Failed to save config: {}", e),
      },
      Err(e) => format!("Could not create config file: {}", e),
    }
  }

  pub fn bond_criteria(&self) -> BondCriteria {
    BondCriteria {
      tolerance: self.bond_tolerance,
      rcut: self.rcut,
    }
  }

  pub fn validate(&self) -> Result<()> {
    if Colormap::by_name(&self.default_colormap).is_none() {
      return Err(DashboardError::Config(format!(
        "unknown colormap '{}'",
        self.default_colormap
      )));
    }
    let (lo, hi) = self.bins_range;
    if lo == 0 || lo > hi {
      return Err(DashboardError::Config(format!("invalid bins range {}..{}", lo, hi)));
    }
    if !(self.rcut > 0.0) || !(self.bond_tolerance >= 0.0) {
      return Err(DashboardError::Config(
        "bond cutoff must be positive and tolerance non-negative".to_string(),
      ));
    }
    Ok(())
  }

  /// Keeps the bin count inside its range even if the file was edited by hand.
  fn sanitized(mut self) -> Self {
    let (lo, hi) = self.bins_range;
    self.default_bins = self.default_bins.clamp(lo, hi);
    self
  }

  fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "mavensgroup", "curvview") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_dashboard_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.default_colormap, "cividis");
    assert_eq!(cfg.default_bins, 30);
    assert_eq!(cfg.bins_range, (5, 50));
    assert_eq!(cfg.default_table_columns, DEFAULT_TABLE_COLUMNS.to_vec());
  }

  #[test]
  fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut cfg = Config::default();
    cfg.default_colormap = "magma_r".into();
    cfg.default_bins = 12;
    let msg = cfg.save_to(&path);
    assert!(msg.starts_with("Config saved"));

    let (loaded, msg) = Config::load_from(&path);
    assert!(msg.starts_with("Config loaded"));
    assert_eq!(loaded, cfg);
  }

  #[test]
  fn missing_or_broken_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (cfg, msg) = Config::load_from(&dir.path().join("absent.json"));
    assert_eq!(cfg, Config::default());
    assert!(msg.contains("defaults"));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    let (cfg, msg) = Config::load_from(&broken);
    assert_eq!(cfg, Config::default());
    assert!(msg.starts_with("Error parsing config"));
  }

  #[test]
  fn invalid_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "default_colormap": "rainbow" }"#).unwrap();

    let (cfg, msg) = Config::load_from(&path);
    assert_eq!(cfg, Config::default());
    assert!(msg.contains("unknown colormap"));

    let bad = Config { rcut: -1.0, ..Config::default() };
    assert!(matches!(bad.validate(), Err(DashboardError::Config(_))));
  }

  #[test]
  fn table_columns_use_header_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "default_table_columns": ["species", "pyrA", "c_pi^2"] }"#).unwrap();
    let (cfg, _) = Config::load_from(&path);
    assert_eq!(
      cfg.default_table_columns,
      vec![Column::Species, Column::PyrA, Column::CPi2]
    );

    std::fs::write(&path, r#"{ "default_table_columns": ["volume"] }"#).unwrap();
    let (cfg, msg) = Config::load_from(&path);
    assert_eq!(cfg, Config::default());
    assert!(msg.contains("Unknown column"), "{}", msg);
  }

  #[test]
  fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "default_bins": 400, "rcut": 3.0 }"#).unwrap();

    let (cfg, _) = Config::load_from(&path);
    assert_eq!(cfg.default_bins, 50);
    assert_eq!(cfg.rcut, 3.0);
    assert_eq!(cfg.default_colormap, "cividis");
  }
}
