// src/model/structure.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
  pub element: String,
  pub position: [f64; 3],
}

/// A finite molecule as read from a structure file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
  pub title: String,
  pub atoms: Vec<Atom>,
}

impl Molecule {
  pub fn len(&self) -> usize {
    self.atoms.len()
  }

  pub fn is_empty(&self) -> bool {
    self.atoms.is_empty()
  }

  /// Formula with elements in alphabetical order, e.g. "H2 O1".
  pub fn formula(&self) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for atom in &self.atoms {
      *counts.entry(atom.element.as_str()).or_insert(0) += 1;
    }
    counts
      .iter()
      .map(|(el, n)| format!("{}{}", el, n))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// One atom of the renderable model handed to the 3D viewer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelAtom {
  pub serial: usize,
  pub name: String,
  pub element: String,
  pub position: [f64; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelBond {
  pub atom1: usize,
  pub atom2: usize,
}

/// Position + connectivity descriptor consumed by the structure viewer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MolecularModel {
  pub atoms: Vec<ModelAtom>,
  pub bonds: Vec<ModelBond>,
}

impl MolecularModel {
  pub fn centroid(&self) -> [f64; 3] {
    if self.atoms.is_empty() {
      return [0.0; 3];
    }
    let mut sum = [0.0; 3];
    for a in &self.atoms {
      sum[0] += a.position[0];
      sum[1] += a.position[1];
      sum[2] += a.position[2];
    }
    let n = self.atoms.len() as f64;
    [sum[0] / n, sum[1] / n, sum[2] / n]
  }
}
