// src/physics/connectivity.rs

use crate::model::elements::covalent_radius;
use crate::model::Molecule;
use nalgebra::Vector3;

/// Distance criteria for deciding whether two atoms are bonded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondCriteria {
  /// Relative tolerance on the sum of covalent radii.
  pub tolerance: f64,
  /// Hard cutoff in Angstrom.
  pub rcut: f64,
}

impl Default for BondCriteria {
  fn default() -> Self {
    Self {
      tolerance: 0.2,
      rcut: 2.5,
    }
  }
}

const MIN_BOND_DIST: f64 = 0.4;

impl BondCriteria {
  pub fn is_bonded(&self, el1: &str, el2: &str, dist: f64) -> bool {
    let max_bond_dist = (covalent_radius(el1) + covalent_radius(el2)) * (1.0 + self.tolerance);
    dist > MIN_BOND_DIST && dist <= max_bond_dist && dist <= self.rcut
  }
}

/// Neighbour lists (sorted indices) for every atom.
pub fn neighbor_lists(molecule: &Molecule, criteria: &BondCriteria) -> Vec<Vec<usize>> {
  let positions: Vec<Vector3<f64>> = molecule
    .atoms
    .iter()
    .map(|a| Vector3::from(a.position))
    .collect();

  let mut neighbors = vec![Vec::new(); molecule.atoms.len()];
  for i in 0..positions.len() {
    for j in (i + 1)..positions.len() {
      // Early distance cutoff
      let d = positions[j] - positions[i];
      if d.x.abs() > criteria.rcut || d.y.abs() > criteria.rcut || d.z.abs() > criteria.rcut {
        continue;
      }
      let dist = d.norm();
      if criteria.is_bonded(&molecule.atoms[i].element, &molecule.atoms[j].element, dist) {
        neighbors[i].push(j);
        neighbors[j].push(i);
      }
    }
  }
  neighbors
}

/// Unique bonds as (i, j) pairs with i < j.
pub fn bond_pairs(neighbors: &[Vec<usize>]) -> Vec<(usize, usize)> {
  let mut bonds = Vec::new();
  for (i, list) in neighbors.iter().enumerate() {
    for &j in list {
      if i < j {
        bonds.push((i, j));
      }
    }
  }
  bonds
}
