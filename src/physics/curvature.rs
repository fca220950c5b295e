// src/physics/curvature.rs

use crate::utils::geometry;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use std::cmp::Ordering;
use std::f64::consts::PI;

/// Local geometry of atom A and its star (the atoms bonded to A).
///
/// All angular quantities are returned in degrees.
///
/// **Reference**: Sabalot-Cuzzubbo, Salvato-Vallverdu, Bégué, Cresson (2020),
/// "Relating the molecular topology and local geometry: Haddon's
/// pyramidalization angle and the Gaussian curvature", J. Chem. Phys. 152, 244310.
pub struct Vertex {
  a: Vector3<f64>,
  star: Vec<Vector3<f64>>,
}

impl Vertex {
  pub fn new(a: [f64; 3], star: &[[f64; 3]]) -> Self {
    Self {
      a: Vector3::from(a),
      star: star.iter().map(|p| Vector3::from(*p)).collect(),
    }
  }

  pub fn valence(&self) -> usize {
    self.star.len()
  }

  fn bonds(&self) -> impl Iterator<Item = Vector3<f64>> + '_ {
    self.star.iter().map(move |b| b - self.a)
  }

  /// Star atoms moved to unit distance from A.
  fn regularized_star(&self) -> Vec<Vector3<f64>> {
    self
      .bonds()
      .map(|u| self.a + u.normalize())
      .collect()
  }

  /// Unit normal of the regularized star plane, pointing away from the star.
  pub fn normal(&self) -> Option<Vector3<f64>> {
    if self.valence() < 3 {
      return None;
    }
    let reg = self.regularized_star();
    let (centroid, mut n) = plane_fit(&reg)?;
    if n.dot(&(self.a - centroid)) < 0.0 {
      n = -n;
    }
    Some(n)
  }

  pub fn average_distance(&self) -> f64 {
    if self.star.is_empty() {
      return f64::NAN;
    }
    self.bonds().map(|u| u.norm()).sum::<f64>() / self.valence() as f64
  }

  /// Angle between the normal and the bonds, minus 90 degrees.
  pub fn pyramidalization(&self) -> f64 {
    let Some(n) = self.normal() else {
      return f64::NAN;
    };
    let total: f64 = self
      .bonds()
      .map(|u| n.dot(&u.normalize()).clamp(-1.0, 1.0).acos())
      .sum();
    (total / self.valence() as f64 - PI / 2.0).to_degrees()
  }

  /// 360 degrees minus the sum of the angles between consecutive bonds.
  pub fn angular_defect(&self) -> f64 {
    let Some(n) = self.normal() else {
      return f64::NAN;
    };
    let units: Vec<Vector3<f64>> = self.bonds().map(|u| u.normalize()).collect();

    // Order the bonds around the normal.
    let e1 = (units[0] - n * n.dot(&units[0])).normalize();
    let e2 = n.cross(&e1);
    let mut order: Vec<(f64, usize)> = units
      .iter()
      .enumerate()
      .map(|(i, u)| (u.dot(&e2).atan2(u.dot(&e1)), i))
      .collect();
    order.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let p = |v: &Vector3<f64>| [v.x, v.y, v.z];
    let sum: f64 = (0..order.len())
      .map(|k| {
        let b1 = &self.star[order[k].1];
        let b2 = &self.star[order[(k + 1) % order.len()].1];
        geometry::calculate_angle(p(b1), p(&self.a), p(b2))
      })
      .sum();
    360.0 - sum
  }

  /// Distance of A from the (least-squares) plane of its star.
  pub fn pyr_distance(&self) -> f64 {
    if self.valence() < 3 {
      return f64::NAN;
    }
    match plane_fit(&self.star) {
      Some((c, n)) => n.dot(&(self.a - c)).abs(),
      None => f64::NAN,
    }
  }

  /// Inverse radius of the sphere through A and its star, 0 when flat.
  pub fn spherical_curvature(&self) -> f64 {
    if self.valence() < 3 {
      return f64::NAN;
    }
    let mut points = Vec::with_capacity(self.valence() + 1);
    points.push(self.a);
    points.extend(self.star.iter().copied());
    match sphere_fit(&points) {
      Some(radius) => 1.0 / radius,
      None => 0.0,
    }
  }

  /// Dihedral angle A-B1-B2-B3, trivalent atoms only.
  pub fn improper(&self) -> f64 {
    if self.valence() != 3 {
      return f64::NAN;
    }
    let p = |v: &Vector3<f64>| [v.x, v.y, v.z];
    geometry::calculate_dihedral(p(&self.a), p(&self.star[0]), p(&self.star[1]), p(&self.star[2]))
      .abs()
  }

  /// Haddon POAV1 hybridization of a trivalent atom.
  pub fn hybridization(&self) -> Option<Hybridization> {
    if self.valence() != 3 {
      return None;
    }
    Some(Hybridization::from_pyramidalization(self.pyramidalization()))
  }
}

/// Coefficients of the h_pi hybrid orbital, h_pi = c_pi s + lambda_pi p_pi.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hybridization {
  pub c_pi2: f64,
  pub lambda_pi2: f64,
  pub m: f64,
  pub n: f64,
  /// Amount of p_pi moved into the sigma system (0 for sp2, 1 for sp3).
  pub n_tilde: f64,
}

impl Hybridization {
  pub fn from_pyramidalization(pyr_a_deg: f64) -> Self {
    let t = pyr_a_deg.to_radians().tan();
    let c_pi2 = 2.0 * t * t;
    let lambda_pi2 = 1.0 - c_pi2;

    // Beyond ~35.26 degrees lambda_pi^2 vanishes and the model breaks down.
    if !(lambda_pi2 > 0.0) {
      return Self {
        c_pi2,
        lambda_pi2,
        m: f64::NAN,
        n: f64::NAN,
        n_tilde: f64::NAN,
      };
    }
    let m = c_pi2 / lambda_pi2;
    let n = 3.0 * m + 2.0;
    Self {
      c_pi2,
      lambda_pi2,
      m,
      n,
      n_tilde: n - 2.0,
    }
  }
}

/// Least-squares plane: (centroid, unit normal). None for degenerate input.
fn plane_fit(points: &[Vector3<f64>]) -> Option<(Vector3<f64>, Vector3<f64>)> {
  if points.len() < 3 {
    return None;
  }
  let centroid = points.iter().sum::<Vector3<f64>>() / points.len() as f64;

  if points.len() == 3 {
    let n = (points[1] - points[0]).cross(&(points[2] - points[0]));
    let norm = n.norm();
    if norm < 1e-12 {
      return None;
    }
    return Some((centroid, n / norm));
  }

  let mut cov = Matrix3::zeros();
  for p in points {
    let d = p - centroid;
    cov += d * d.transpose();
  }
  let eig = cov.symmetric_eigen();
  let (imin, _) = eig
    .eigenvalues
    .iter()
    .enumerate()
    .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))?;
  let n: Vector3<f64> = eig.eigenvectors.column(imin).into_owned();
  Some((centroid, n.normalize()))
}

/// Radius of the (least-squares) sphere through `points`, None if coplanar.
fn sphere_fit(points: &[Vector3<f64>]) -> Option<f64> {
  if points.len() < 4 {
    return None;
  }
  // |p - c|^2 = R^2  <=>  2 p.c + (R^2 - |c|^2) = |p|^2, linear in (c, k).
  let origin = points.iter().sum::<Vector3<f64>>() / points.len() as f64;
  let rows = points.len();
  let mut a = DMatrix::<f64>::zeros(rows, 4);
  let mut b = DVector::<f64>::zeros(rows);
  for (i, p) in points.iter().enumerate() {
    let q = p - origin;
    a[(i, 0)] = 2.0 * q.x;
    a[(i, 1)] = 2.0 * q.y;
    a[(i, 2)] = 2.0 * q.z;
    a[(i, 3)] = 1.0;
    b[i] = q.norm_squared();
  }

  let svd = a.svd(true, true);
  let smax = svd.singular_values.max();
  let smin = svd.singular_values.min();
  if smax <= 0.0 || smin / smax < 1e-8 {
    return None;
  }
  let x = svd.solve(&b, 1e-12).ok()?;
  let c = Vector3::new(x[0], x[1], x[2]);
  let r2 = x[3] + c.norm_squared();
  if r2 <= 0.0 {
    return None;
  }
  Some(r2.sqrt())
}
