// src/model/records.rs

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every column of the per-atom record set, in table order.
///
/// Serialized by its table header name, e.g. `"pyrA"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Column {
  AtomIdx,
  Species,
  AtomA,
  StarA,
  PyrA,
  AngularDefect,
  NStarA,
  SphericalCurvature,
  Improper,
  PyrDistance,
  Hybridization,
  M,
  N,
  CPi2,
  LambdaPi2,
  AveNeighbDist,
  Custom,
}

impl Column {
  pub const ALL: [Column; 17] = [
    Column::AtomIdx,
    Column::Species,
    Column::AtomA,
    Column::StarA,
    Column::PyrA,
    Column::AngularDefect,
    Column::NStarA,
    Column::SphericalCurvature,
    Column::Improper,
    Column::PyrDistance,
    Column::Hybridization,
    Column::M,
    Column::N,
    Column::CPi2,
    Column::LambdaPi2,
    Column::AveNeighbDist,
    Column::Custom,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Column::AtomIdx => "atom_idx",
      Column::Species => "species",
      Column::AtomA => "atom_A",
      Column::StarA => "star_A",
      Column::PyrA => "pyrA",
      Column::AngularDefect => "angular_defect",
      Column::NStarA => "n_star_A",
      Column::SphericalCurvature => "spherical_curvature",
      Column::Improper => "improper",
      Column::PyrDistance => "pyr_distance",
      Column::Hybridization => "hybridization",
      Column::M => "m",
      Column::N => "n",
      Column::CPi2 => "c_pi^2",
      Column::LambdaPi2 => "lambda_pi^2",
      Column::AveNeighbDist => "ave. neighb. dist.",
      Column::Custom => "custom",
    }
  }

  pub fn from_name(name: &str) -> Option<Column> {
    Column::ALL.iter().copied().find(|c| c.name() == name)
  }

  pub fn parse(name: &str) -> Result<Column> {
    Column::from_name(name).ok_or_else(|| DashboardError::UnknownColumn(name.to_string()))
  }

  /// `atom_idx` and `species` identify a row and are never edited.
  pub fn is_identity(self) -> bool {
    matches!(self, Column::AtomIdx | Column::Species)
  }

  pub fn is_coordinates(self) -> bool {
    matches!(self, Column::AtomA | Column::StarA)
  }

  /// Columns that can be mapped on the structure or plotted.
  pub fn is_scalar(self) -> bool {
    !self.is_identity() && !self.is_coordinates()
  }

  pub fn scalar_columns() -> Vec<Column> {
    Column::ALL.iter().copied().filter(|c| c.is_scalar()).collect()
  }
}

impl TryFrom<String> for Column {
  type Error = DashboardError;

  fn try_from(name: String) -> Result<Self> {
    Column::parse(&name)
  }
}

impl From<Column> for String {
  fn from(column: Column) -> Self {
    column.name().to_string()
  }
}

impl fmt::Display for Column {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A single table cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
  Index(usize),
  Text(String),
  Number(f64),
  Point([f64; 3]),
  Points(Vec<[f64; 3]>),
}

fn format_point(p: &[f64; 3]) -> String {
  format!("[{}, {}, {}]", p[0], p[1], p[2])
}

impl CellValue {
  /// Full-precision text; NaN is rendered as an empty cell.
  pub fn raw_text(&self) -> String {
    match self {
      CellValue::Index(i) => i.to_string(),
      CellValue::Text(s) => s.clone(),
      CellValue::Number(v) if v.is_nan() => String::new(),
      CellValue::Number(v) => v.to_string(),
      CellValue::Point(p) => format_point(p),
      CellValue::Points(ps) => format!(
        "[{}]",
        ps.iter().map(format_point).collect::<Vec<_>>().join(", ")
      ),
    }
  }

  /// Display text with numbers rounded to `decimals` places.
  pub fn fixed_text(&self, decimals: usize) -> String {
    match self {
      CellValue::Number(v) if v.is_nan() => String::new(),
      CellValue::Number(v) => format!("{:.*}", decimals, v),
      other => other.raw_text(),
    }
  }
}

/// One row of the record set.
#[derive(Clone, Debug, PartialEq)]
pub struct AtomRecord {
  pub atom_idx: usize,
  pub species: String,
  pub atom_a: [f64; 3],
  pub star_a: Vec<[f64; 3]>,
  pub pyr_a: f64,
  pub angular_defect: f64,
  pub n_star_a: f64,
  pub spherical_curvature: f64,
  pub improper: f64,
  pub pyr_distance: f64,
  pub hybridization: f64,
  pub m: f64,
  pub n: f64,
  pub c_pi2: f64,
  pub lambda_pi2: f64,
  pub ave_neighb_dist: f64,
  pub custom: f64,
}

impl AtomRecord {
  /// A row with every descriptor undefined.
  pub fn bare(atom_idx: usize, species: &str, atom_a: [f64; 3]) -> Self {
    Self {
      atom_idx,
      species: species.to_string(),
      atom_a,
      star_a: Vec::new(),
      pyr_a: f64::NAN,
      angular_defect: f64::NAN,
      n_star_a: 0.0,
      spherical_curvature: f64::NAN,
      improper: f64::NAN,
      pyr_distance: f64::NAN,
      hybridization: f64::NAN,
      m: f64::NAN,
      n: f64::NAN,
      c_pi2: f64::NAN,
      lambda_pi2: f64::NAN,
      ave_neighb_dist: f64::NAN,
      custom: 0.0,
    }
  }

  pub fn scalar(&self, column: Column) -> Option<f64> {
    match column {
      Column::PyrA => Some(self.pyr_a),
      Column::AngularDefect => Some(self.angular_defect),
      Column::NStarA => Some(self.n_star_a),
      Column::SphericalCurvature => Some(self.spherical_curvature),
      Column::Improper => Some(self.improper),
      Column::PyrDistance => Some(self.pyr_distance),
      Column::Hybridization => Some(self.hybridization),
      Column::M => Some(self.m),
      Column::N => Some(self.n),
      Column::CPi2 => Some(self.c_pi2),
      Column::LambdaPi2 => Some(self.lambda_pi2),
      Column::AveNeighbDist => Some(self.ave_neighb_dist),
      Column::Custom => Some(self.custom),
      Column::AtomIdx | Column::Species | Column::AtomA | Column::StarA => None,
    }
  }

  pub fn scalar_mut(&mut self, column: Column) -> Option<&mut f64> {
    match column {
      Column::PyrA => Some(&mut self.pyr_a),
      Column::AngularDefect => Some(&mut self.angular_defect),
      Column::NStarA => Some(&mut self.n_star_a),
      Column::SphericalCurvature => Some(&mut self.spherical_curvature),
      Column::Improper => Some(&mut self.improper),
      Column::PyrDistance => Some(&mut self.pyr_distance),
      Column::Hybridization => Some(&mut self.hybridization),
      Column::M => Some(&mut self.m),
      Column::N => Some(&mut self.n),
      Column::CPi2 => Some(&mut self.c_pi2),
      Column::LambdaPi2 => Some(&mut self.lambda_pi2),
      Column::AveNeighbDist => Some(&mut self.ave_neighb_dist),
      Column::Custom => Some(&mut self.custom),
      Column::AtomIdx | Column::Species | Column::AtomA | Column::StarA => None,
    }
  }

  pub fn cell(&self, column: Column) -> CellValue {
    match column {
      Column::AtomIdx => CellValue::Index(self.atom_idx),
      Column::Species => CellValue::Text(self.species.clone()),
      Column::AtomA => CellValue::Point(self.atom_a),
      Column::StarA => CellValue::Points(self.star_a.clone()),
      scalar => CellValue::Number(self.scalar(scalar).unwrap_or(f64::NAN)),
    }
  }
}

/// Ordered per-atom records; row `i` always has `atom_idx == i`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordSet {
  rows: Vec<AtomRecord>,
}

impl RecordSet {
  pub fn new(mut rows: Vec<AtomRecord>) -> Self {
    rows.sort_by_key(|r| r.atom_idx);
    Self { rows }
  }

  pub fn rows(&self) -> &[AtomRecord] {
    &self.rows
  }

  pub fn rows_mut(&mut self) -> &mut [AtomRecord] {
    &mut self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// Values of a scalar column in row order (NaN kept).
  pub fn column_values(&self, column: Column) -> Result<Vec<f64>> {
    if !column.is_scalar() {
      return Err(DashboardError::NotScalar(column.name().to_string()));
    }
    Ok(
      self
        .rows
        .iter()
        .map(|r| r.scalar(column).unwrap_or(f64::NAN))
        .collect(),
    )
  }

  /// Equality that treats two undefined (NaN) values as equal.
  pub fn same_values(&self, other: &RecordSet) -> bool {
    let same = |a: f64, b: f64| a == b || (a.is_nan() && b.is_nan());
    self.len() == other.len()
      && self.rows.iter().zip(&other.rows).all(|(a, b)| {
        a.atom_idx == b.atom_idx
          && a.species == b.species
          && a.atom_a == b.atom_a
          && a.star_a == b.star_a
          && Column::scalar_columns()
            .into_iter()
            .all(|c| same(a.scalar(c).unwrap_or(f64::NAN), b.scalar(c).unwrap_or(f64::NAN)))
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_round_trip_through_lookup() {
    for col in Column::ALL {
      assert_eq!(Column::from_name(col.name()), Some(col));
    }
    assert!(Column::from_name("volume").is_none());
    assert!(matches!(
      Column::parse("volume"),
      Err(DashboardError::UnknownColumn(_))
    ));
  }

  #[test]
  fn scalar_columns_exclude_identity_and_coordinates() {
    let scalars = Column::scalar_columns();
    assert!(!scalars.contains(&Column::AtomIdx));
    assert!(!scalars.contains(&Column::Species));
    assert!(!scalars.contains(&Column::AtomA));
    assert!(!scalars.contains(&Column::StarA));
    assert!(scalars.contains(&Column::Custom));
    assert_eq!(scalars.len(), 13);
  }

  #[test]
  fn nan_cells_render_empty() {
    let row = AtomRecord::bare(0, "C", [0.0, 1.0, 2.0]);
    assert_eq!(row.cell(Column::PyrA).raw_text(), "");
    assert_eq!(row.cell(Column::Custom).fixed_text(4), "0.0000");
    assert_eq!(row.cell(Column::AtomA).raw_text(), "[0, 1, 2]");
    assert_eq!(row.cell(Column::Species).raw_text(), "C");
  }

  #[test]
  fn record_set_orders_rows_by_index() {
    let set = RecordSet::new(vec![
      AtomRecord::bare(1, "H", [0.0; 3]),
      AtomRecord::bare(0, "O", [0.0; 3]),
    ]);
    let species: Vec<&str> = set.rows().iter().map(|r| r.species.as_str()).collect();
    assert_eq!(species, vec!["O", "H"]);
  }

  #[test]
  fn column_values_rejects_identity_columns() {
    let set = RecordSet::new(vec![AtomRecord::bare(0, "O", [0.0; 3])]);
    assert!(set.column_values(Column::Species).is_err());
    assert_eq!(set.column_values(Column::Custom).unwrap(), vec![0.0]);
  }

  #[test]
  fn undefined_values_compare_equal() {
    let a = RecordSet::new(vec![AtomRecord::bare(0, "O", [0.0; 3])]);
    let mut b = a.clone();
    assert!(a.same_values(&b));
    b.rows_mut()[0].custom = 1.0;
    assert!(!a.same_values(&b));
  }
}
