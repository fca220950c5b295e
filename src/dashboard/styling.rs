// src/dashboard/styling.rs

use crate::analysis::stats::linspace;
use crate::analysis::{Colormap, Rgb};
use crate::model::{Column, ElementColors, RecordSet};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const DEFAULT_NAN_COLOR: &str = "#000000";
pub const UNKNOWN_ELEMENT_COLOR: &str = "#000000";
pub const COLORBAR_SAMPLES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationType {
  Stick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomStyle {
  pub color: String,
  pub visualization_type: VisualizationType,
}

impl AtomStyle {
  fn stick(color: String) -> Self {
    Self {
      color,
      visualization_type: VisualizationType::Stick,
    }
  }
}

/// Per-atom styles keyed by atom index.
pub type StyleMap = BTreeMap<usize, AtomStyle>;

/// Color-mapping inputs shared by the structure styling and the colorbar.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRequest {
  pub column: Option<Column>,
  pub colormap: String,
  pub min: Option<f64>,
  pub max: Option<f64>,
  pub nan_color: Option<String>,
}

fn hex_color_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^#[A-Fa-f0-9]{6}$").expect("static pattern"))
}

/// Returns `text` if it is a `#RRGGBB` color, the default NaN color otherwise.
pub fn validate_nan_color(text: Option<&str>) -> String {
  match text {
    Some(t) if hex_color_pattern().is_match(t) => t.to_string(),
    _ => DEFAULT_NAN_COLOR.to_string(),
  }
}

/// Explicit bounds win; missing ones come from the data, ignoring NaN.
/// An all-NaN column without explicit bounds maps over [0, 1].
pub fn effective_bounds(values: &[f64], min: Option<f64>, max: Option<f64>) -> (f64, f64) {
  let finite = values.iter().copied().filter(|v| !v.is_nan());
  let (dmin, dmax) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
    (lo.min(v), hi.max(v))
  });

  let lo = min
    .filter(|v| !v.is_nan())
    .unwrap_or(if dmin.is_finite() { dmin } else { 0.0 });
  let hi = max
    .filter(|v| !v.is_nan())
    .unwrap_or(if dmax.is_finite() { dmax } else { 1.0 });
  (lo, hi)
}

/// Linear map of `value` from [lo, hi] to [0, 1], clamped. A zero-width range maps to 0.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
  if hi == lo {
    return 0.0;
  }
  ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

pub fn style_atoms(
  records: Option<&RecordSet>,
  request: &ColorRequest,
  element_colors: &ElementColors,
) -> StyleMap {
  let Some(records) = records else {
    return StyleMap::new();
  };

  let values = request
    .column
    .and_then(|c| records.column_values(c).ok());

  let Some(values) = values else {
    return records
      .rows()
      .iter()
      .map(|r| {
        let color = element_colors
          .color(&r.species)
          .unwrap_or(UNKNOWN_ELEMENT_COLOR)
          .to_string();
        (r.atom_idx, AtomStyle::stick(color))
      })
      .collect();
  };

  let cmap = Colormap::by_name_or_default(&request.colormap);
  let nan_color = validate_nan_color(request.nan_color.as_deref());
  let (lo, hi) = effective_bounds(&values, request.min, request.max);

  records
    .rows()
    .iter()
    .zip(values)
    .map(|(r, v)| {
      let color = if v.is_nan() {
        nan_color.clone()
      } else {
        cmap.at(normalize(v, lo, hi)).to_hex()
      };
      (r.atom_idx, AtomStyle::stick(color))
    })
    .collect()
}

/// Legend for the current color mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorbarFigure {
  Empty,
  Gradient {
    title: String,
    min: f64,
    max: f64,
    samples: Vec<(f64, Rgb)>,
  },
}

pub fn build_colorbar(records: Option<&RecordSet>, request: &ColorRequest) -> ColorbarFigure {
  let (Some(records), Some(column)) = (records, request.column) else {
    return ColorbarFigure::Empty;
  };
  let Ok(values) = records.column_values(column) else {
    return ColorbarFigure::Empty;
  };

  let cmap = Colormap::by_name_or_default(&request.colormap);
  let (lo, hi) = effective_bounds(&values, request.min, request.max);
  let samples = linspace(lo, hi, COLORBAR_SAMPLES)
    .into_iter()
    .map(|v| (v, cmap.at(normalize(v, lo, hi))))
    .collect();

  ColorbarFigure::Gradient {
    title: column.name().to_string(),
    min: lo,
    max: hi,
    samples,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::AtomRecord;

  fn records(values: &[f64]) -> RecordSet {
    RecordSet::new(
      values
        .iter()
        .enumerate()
        .map(|(i, v)| {
          let mut r = AtomRecord::bare(i, if i == 0 { "O" } else { "H" }, [0.0; 3]);
          r.pyr_a = *v;
          r
        })
        .collect(),
    )
  }

  fn request(min: Option<f64>, max: Option<f64>, nan: Option<&str>) -> ColorRequest {
    ColorRequest {
      column: Some(Column::PyrA),
      colormap: "viridis".into(),
      min,
      max,
      nan_color: nan.map(str::to_string),
    }
  }

  #[test]
  fn nan_color_validation() {
    assert_eq!(validate_nan_color(Some("#FF00aa")), "#FF00aa");
    assert_eq!(validate_nan_color(Some("red")), DEFAULT_NAN_COLOR);
    assert_eq!(validate_nan_color(Some("#FF00aa ")), DEFAULT_NAN_COLOR);
    assert_eq!(validate_nan_color(None), DEFAULT_NAN_COLOR);
  }

  #[test]
  fn bounds_map_to_colormap_ends() {
    let set = records(&[2.0, 6.0, 10.0, f64::NAN]);
    let styles = style_atoms(Some(&set), &request(None, None, None), &ElementColors::bundled());
    let cm = Colormap::by_name("viridis").unwrap();

    assert_eq!(styles[&0].color, cm.at(0.0).to_hex());
    assert_eq!(styles[&1].color, cm.at(0.5).to_hex());
    assert_eq!(styles[&2].color, cm.at(1.0).to_hex());
    assert_eq!(styles[&3].color, DEFAULT_NAN_COLOR);
    assert!(styles.values().all(|s| s.visualization_type == VisualizationType::Stick));
  }

  #[test]
  fn explicit_bounds_override_data() {
    let set = records(&[2.0, 10.0]);
    assert_eq!(effective_bounds(&[2.0, 10.0], Some(0.0), Some(1.0)), (0.0, 1.0));

    let styles = style_atoms(
      Some(&set),
      &request(Some(0.0), Some(1.0), None),
      &ElementColors::bundled(),
    );
    let top = Colormap::by_name("viridis").unwrap().at(1.0).to_hex();
    assert_eq!(styles[&0].color, top);
    assert_eq!(styles[&1].color, top);
  }

  #[test]
  fn nan_uses_configured_color_regardless_of_bounds() {
    let set = records(&[f64::NAN, 1.0]);
    let styles = style_atoms(
      Some(&set),
      &request(Some(-5.0), Some(5.0), Some("#12AB34")),
      &ElementColors::bundled(),
    );
    assert_eq!(styles[&0].color, "#12AB34");
  }

  #[test]
  fn no_column_uses_element_colors() {
    let set = records(&[1.0, 2.0]);
    let mut req = request(None, None, None);
    req.column = None;
    let colors = ElementColors::bundled();
    let styles = style_atoms(Some(&set), &req, &colors);

    assert_eq!(Some(styles[&0].color.as_str()), colors.color("O"));
    assert_eq!(Some(styles[&1].color.as_str()), colors.color("H"));
    assert_ne!(styles[&0].color, styles[&1].color);
  }

  #[test]
  fn unknown_species_is_black() {
    let set = RecordSet::new(vec![AtomRecord::bare(0, "Qq", [0.0; 3])]);
    let mut req = request(None, None, None);
    req.column = None;
    let styles = style_atoms(Some(&set), &req, &ElementColors::bundled());
    assert_eq!(styles[&0].color, UNKNOWN_ELEMENT_COLOR);
  }

  #[test]
  fn constant_column_maps_to_low_end() {
    assert_eq!(normalize(3.0, 3.0, 3.0), 0.0);
    assert_eq!(normalize(-1.0, 0.0, 2.0), 0.0);
    assert_eq!(normalize(9.0, 0.0, 2.0), 1.0);
  }

  #[test]
  fn colorbar_spans_effective_range() {
    let set = records(&[2.0, 10.0]);
    match build_colorbar(Some(&set), &request(None, Some(20.0), None)) {
      ColorbarFigure::Gradient { title, min, max, samples } => {
        assert_eq!(title, "pyrA");
        assert_eq!((min, max), (2.0, 20.0));
        assert_eq!(samples.len(), COLORBAR_SAMPLES);
        assert_eq!(samples[0].0, 2.0);
      }
      ColorbarFigure::Empty => panic!("expected a gradient"),
    }

    let mut req = request(None, None, None);
    req.column = None;
    assert_eq!(build_colorbar(Some(&set), &req), ColorbarFigure::Empty);
  }
}
