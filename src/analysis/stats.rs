// src/analysis/stats.rs

use nalgebra::{DMatrix, DVector};
use std::cmp::Ordering;

/// Descriptive statistics of a sample (NaN already removed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
  pub count: usize,
  pub mean: f64,
  /// Sample standard deviation (n - 1); NaN for a single value.
  pub std: f64,
  pub min: f64,
  pub q25: f64,
  pub median: f64,
  pub q75: f64,
  pub max: f64,
}

fn sorted(values: &[f64]) -> Vec<f64> {
  let mut v = values.to_vec();
  v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
  v
}

/// Quantile by linear interpolation between closest ranks, on sorted data.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
  let pos = q * (sorted.len() - 1) as f64;
  let lo = pos.floor() as usize;
  let hi = pos.ceil() as usize;
  sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn describe(values: &[f64]) -> Option<Summary> {
  if values.is_empty() {
    return None;
  }
  let s = sorted(values);
  let n = s.len() as f64;
  let mean = s.iter().sum::<f64>() / n;
  let std = if s.len() > 1 {
    (s.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
  } else {
    f64::NAN
  };

  Some(Summary {
    count: s.len(),
    mean,
    std,
    min: s[0],
    q25: quantile_sorted(&s, 0.25),
    median: quantile_sorted(&s, 0.5),
    q75: quantile_sorted(&s, 0.75),
    max: s[s.len() - 1],
  })
}

/// Equal-width bins; `probabilities` sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
  pub edges: Vec<f64>,
  pub probabilities: Vec<f64>,
}

impl Histogram {
  pub fn bins(&self) -> usize {
    self.probabilities.len()
  }
}

/// Exactly `nbins` bins over [min, max]; the last bin is closed.
/// A constant sample gets the range [v - 0.5, v + 0.5].
pub fn histogram(values: &[f64], nbins: usize) -> Option<Histogram> {
  if values.is_empty() || nbins == 0 {
    return None;
  }
  let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
  let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
  if lo == hi {
    lo -= 0.5;
    hi += 0.5;
  }
  let width = (hi - lo) / nbins as f64;

  let mut counts = vec![0usize; nbins];
  for v in values {
    let bin = (((v - lo) / width).floor() as usize).min(nbins - 1);
    counts[bin] += 1;
  }

  let total = values.len() as f64;
  Some(Histogram {
    edges: (0..=nbins).map(|i| lo + width * i as f64).collect(),
    probabilities: counts.iter().map(|&c| c as f64 / total).collect(),
  })
}

/// Tukey box plot: quartiles, 1.5 IQR whiskers and the points beyond them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
  pub q1: f64,
  pub median: f64,
  pub q3: f64,
  pub whisker_low: f64,
  pub whisker_high: f64,
  pub outliers: Vec<f64>,
}

pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
  if values.is_empty() {
    return None;
  }
  let s = sorted(values);
  let q1 = quantile_sorted(&s, 0.25);
  let q3 = quantile_sorted(&s, 0.75);
  let iqr = q3 - q1;
  let (fence_lo, fence_hi) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

  let inside: Vec<f64> = s
    .iter()
    .copied()
    .filter(|v| *v >= fence_lo && *v <= fence_hi)
    .collect();
  let outliers = s
    .iter()
    .copied()
    .filter(|v| *v < fence_lo || *v > fence_hi)
    .collect();

  Some(BoxSummary {
    q1,
    median: quantile_sorted(&s, 0.5),
    q3,
    whisker_low: inside.first().copied().unwrap_or(q1),
    whisker_high: inside.last().copied().unwrap_or(q3),
    outliers,
  })
}

/// Least-squares polynomial coefficients, lowest order first.
/// None when x has fewer than two distinct values or the system is not finite.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> Option<Vec<f64>> {
  if x.len() != y.len() || x.len() < 2 {
    return None;
  }
  if x.iter().chain(y).any(|v| !v.is_finite()) {
    return None;
  }
  let (xmin, xmax) = x
    .iter()
    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
  if xmin == xmax {
    return None;
  }

  let a = DMatrix::from_fn(x.len(), degree + 1, |i, j| x[i].powi(j as i32));
  let b = DVector::from_column_slice(y);
  // SVD panics on NaN singular values; overflowing powers must not reach it
  if !a.norm_squared().is_finite() || !b.norm_squared().is_finite() {
    return None;
  }

  let svd = a.svd(true, true);
  let coeffs = svd.solve(&b, 1e-12).ok()?;
  if coeffs.iter().any(|c| !c.is_finite()) {
    return None;
  }
  Some(coeffs.iter().copied().collect())
}

/// Horner evaluation of coefficients from `polyfit`.
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
  coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
  match n {
    0 => Vec::new(),
    1 => vec![start],
    _ => {
      let step = (end - start) / (n - 1) as f64;
      (0..n).map(|i| start + step * i as f64).collect()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
  }

  #[test]
  fn describe_matches_pandas_conventions() {
    let s = describe(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(s.count, 4);
    assert!(close(s.mean, 2.5));
    assert!(close(s.std, 1.290_994_448_735_805_6));
    assert!(close(s.q25, 1.75));
    assert!(close(s.median, 2.5));
    assert!(close(s.q75, 3.25));
    assert_eq!((s.min, s.max), (1.0, 4.0));
  }

  #[test]
  fn describe_single_value() {
    let s = describe(&[5.0]).unwrap();
    assert!(s.std.is_nan());
    assert_eq!(s.median, 5.0);
    assert!(describe(&[]).is_none());
  }

  #[test]
  fn histogram_has_requested_bins() {
    let values: Vec<f64> = (0..100).map(|i| i as f64 * 0.37).collect();
    for n in [5, 17, 30, 50] {
      let h = histogram(&values, n).unwrap();
      assert_eq!(h.bins(), n);
      assert_eq!(h.edges.len(), n + 1);
      assert!(close(h.probabilities.iter().sum::<f64>(), 1.0));
    }
  }

  #[test]
  fn histogram_includes_maximum_in_last_bin() {
    let h = histogram(&[0.0, 1.0, 2.0], 2).unwrap();
    assert_eq!(h.edges, vec![0.0, 1.0, 2.0]);
    assert!(close(h.probabilities[0], 1.0 / 3.0));
    assert!(close(h.probabilities[1], 2.0 / 3.0));
  }

  #[test]
  fn constant_sample_gets_unit_range() {
    let h = histogram(&[3.0, 3.0], 4).unwrap();
    assert_eq!(h.edges.first(), Some(&2.5));
    assert_eq!(h.edges.last(), Some(&3.5));
    assert!(close(h.probabilities.iter().sum::<f64>(), 1.0));
  }

  #[test]
  fn box_flags_outliers() {
    let b = box_summary(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
    assert_eq!(b.q1, 2.0);
    assert_eq!(b.q3, 4.0);
    assert_eq!(b.whisker_low, 1.0);
    assert_eq!(b.whisker_high, 4.0);
    assert_eq!(b.outliers, vec![100.0]);
  }

  #[test]
  fn quadratic_fit_is_exact_on_a_parabola() {
    let x = linspace(-2.0, 3.0, 11);
    let y: Vec<f64> = x.iter().map(|v| 1.0 - 2.0 * v + 0.5 * v * v).collect();
    let c = polyfit(&x, &y, 2).unwrap();
    assert!((c[0] - 1.0).abs() < 1e-8);
    assert!((c[1] + 2.0).abs() < 1e-8);
    assert!((c[2] - 0.5).abs() < 1e-8);
    assert!((polyval(&c, 4.0) - 1.0).abs() < 1e-7);
  }

  #[test]
  fn fit_needs_spread_in_x() {
    assert!(polyfit(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0], 2).is_none());
    assert!(polyfit(&[1.0], &[1.0], 2).is_none());
  }

  #[test]
  fn fit_rejects_values_that_overflow() {
    let y = [1.0, 2.0, 3.0, 4.0];
    assert!(polyfit(&[0.0, 0.0, 0.0, 1e200], &y, 2).is_none());
    assert!(polyfit(&[0.0, 0.0, 0.0, f64::INFINITY], &y, 2).is_none());
    assert!(polyfit(&[0.0, 1.0, 2.0, 3.0], &[1.0, f64::NEG_INFINITY, 3.0, 4.0], 2).is_none());
    assert!(polyfit(&[0.0, 1.0, 2.0, 3.0], &y, 2).is_some());
  }

  #[test]
  fn linspace_endpoints() {
    let v = linspace(0.0, 1.0, 100);
    assert_eq!(v.len(), 100);
    assert_eq!(v[0], 0.0);
    assert!(close(v[99], 1.0));
  }
}
