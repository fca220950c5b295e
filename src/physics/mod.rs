// src/physics/mod.rs
pub mod connectivity;
pub mod curvature;

use crate::error::{DashboardError, Result};
use crate::model::{AtomRecord, ModelAtom, ModelBond, MolecularModel, Molecule, RecordSet};
use connectivity::BondCriteria;
use curvature::Vertex;
use rayon::prelude::*;

/// Output of a structural analysis: per-atom records plus the viewer model.
#[derive(Clone, Debug, Default)]
pub struct Analysis {
  pub records: RecordSet,
  pub model: MolecularModel,
}

/// Computes per-atom descriptors and connectivity for a molecule.
pub trait StructureAnalyzer {
  fn analyze(&self, molecule: &Molecule) -> Result<Analysis>;
}

/// Curvature descriptors from the local geometry of each atom and its bonded star.
#[derive(Debug, Clone, Default)]
pub struct CurvatureAnalyzer {
  pub criteria: BondCriteria,
}

impl CurvatureAnalyzer {
  pub fn new(criteria: BondCriteria) -> Self {
    Self { criteria }
  }
}

fn atom_record(molecule: &Molecule, idx: usize, neighbors: &[usize]) -> AtomRecord {
  let atom = &molecule.atoms[idx];
  let star: Vec<[f64; 3]> = neighbors.iter().map(|&j| molecule.atoms[j].position).collect();

  let mut row = AtomRecord::bare(idx, &atom.element, atom.position);
  row.n_star_a = star.len() as f64;
  if star.is_empty() {
    return row;
  }

  let vertex = Vertex::new(atom.position, &star);
  row.ave_neighb_dist = vertex.average_distance();
  row.pyr_a = vertex.pyramidalization();
  row.angular_defect = vertex.angular_defect();
  row.pyr_distance = vertex.pyr_distance();
  row.spherical_curvature = vertex.spherical_curvature();
  row.improper = vertex.improper();

  if let Some(h) = vertex.hybridization() {
    row.c_pi2 = h.c_pi2;
    row.lambda_pi2 = h.lambda_pi2;
    row.m = h.m;
    row.n = h.n;
    row.hybridization = h.n_tilde;
  }

  row.star_a = star;
  row
}

fn build_model(molecule: &Molecule, neighbors: &[Vec<usize>]) -> MolecularModel {
  let atoms = molecule
    .atoms
    .iter()
    .enumerate()
    .map(|(i, a)| ModelAtom {
      serial: i,
      name: format!("{}{}", a.element, i),
      element: a.element.clone(),
      position: a.position,
    })
    .collect();

  let bonds = connectivity::bond_pairs(neighbors)
    .into_iter()
    .map(|(atom1, atom2)| ModelBond { atom1, atom2 })
    .collect();

  MolecularModel { atoms, bonds }
}

impl StructureAnalyzer for CurvatureAnalyzer {
  fn analyze(&self, molecule: &Molecule) -> Result<Analysis> {
    if molecule.is_empty() {
      return Err(DashboardError::EmptyStructure);
    }

    let neighbors = connectivity::neighbor_lists(molecule, &self.criteria);

    let rows: Vec<AtomRecord> = (0..molecule.len())
      .into_par_iter()
      .map(|i| atom_record(molecule, i, &neighbors[i]))
      .collect();

    let model = build_model(molecule, &neighbors);
    log::debug!(
      "Analysed {} atoms, {} bonds (tolerance {}, rcut {} Å)",
      rows.len(),
      model.bonds.len(),
      self.criteria.tolerance,
      self.criteria.rcut
    );

    Ok(Analysis {
      records: RecordSet::new(rows),
      model,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io;
  use crate::model::Column;

  fn c20() -> Analysis {
    let mol = io::default_structure(None).unwrap();
    CurvatureAnalyzer::default().analyze(&mol).unwrap()
  }

  #[test]
  fn c20_atoms_are_equivalent() {
    let analysis = c20();
    assert_eq!(analysis.records.len(), 20);
    assert_eq!(analysis.model.bonds.len(), 30);

    for row in analysis.records.rows() {
      assert_eq!(row.n_star_a, 3.0);
      assert_eq!(row.star_a.len(), 3);
      assert!((row.pyr_a - 20.905).abs() < 1e-2, "pyrA = {}", row.pyr_a);
      assert!((row.angular_defect - 36.0).abs() < 1e-6);
      assert!((row.pyr_distance - 0.51739).abs() < 1e-3);
      assert!((row.spherical_curvature - 0.49217).abs() < 1e-3);
      assert!((row.ave_neighb_dist - 1.45).abs() < 1e-4);
      assert!((row.c_pi2 - 0.291796).abs() < 1e-3);
      assert!((row.lambda_pi2 - 0.708204).abs() < 1e-3);
      assert!((row.m - 0.41202).abs() < 1e-3);
      assert!((row.n - 3.23607).abs() < 1e-2);
      assert!((row.hybridization - 1.23607).abs() < 1e-2);
      assert!(row.improper.is_finite());
      assert_eq!(row.custom, 0.0);
    }
  }

  #[test]
  fn rows_follow_atom_order() {
    let analysis = c20();
    let idx: Vec<usize> = analysis.records.rows().iter().map(|r| r.atom_idx).collect();
    assert_eq!(idx, (0..20).collect::<Vec<_>>());
    assert_eq!(analysis.model.atoms[7].name, "C7");
  }

  #[test]
  fn water_has_one_row_per_atom() {
    let text = "3
H2O molecule
O   -0.111056  0.033897  0.043165
H    0.966057  0.959148 -1.089095
H    0.796629 -1.497157  0.403985
";
    let mol = io::xyz::parse(text).unwrap();
    let analysis = CurvatureAnalyzer::default().analyze(&mol).unwrap();
    let rows = analysis.records.rows();

    assert_eq!(rows.len(), 3);
    let species: Vec<&str> = analysis.records.rows().iter().map(|r| r.species.as_str()).collect();
    assert_eq!(species, vec!["O", "H", "H"]);
    assert_eq!(rows.iter().map(|r| r.atom_idx).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(analysis.records.column_values(Column::Custom).unwrap(), vec![0.0; 3]);
    assert!(rows.iter().all(|r| r.pyr_a.is_nan()));
  }

  #[test]
  fn empty_molecule_is_rejected() {
    let err = CurvatureAnalyzer::default().analyze(&Molecule::default()).unwrap_err();
    assert!(matches!(err, DashboardError::EmptyStructure));
  }
}
