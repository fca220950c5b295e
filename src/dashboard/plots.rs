// src/dashboard/plots.rs

use crate::analysis::stats::{self, BoxSummary, Histogram, Summary};
use crate::model::{Column, RecordSet};
use std::fmt;

pub const TREND_DEGREE: usize = 2;
pub const TREND_POINTS: usize = 100;
const TREND_PADDING: f64 = 0.05;

/// Abscissa of the distribution plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotMode {
  Histogram,
  Against(Column),
}

impl PlotMode {
  pub fn name(self) -> &'static str {
    match self {
      PlotMode::Histogram => "histogram",
      PlotMode::Against(c) => c.name(),
    }
  }

  /// `histogram` followed by every scalar column.
  pub fn options() -> Vec<PlotMode> {
    std::iter::once(PlotMode::Histogram)
      .chain(Column::scalar_columns().into_iter().map(PlotMode::Against))
      .collect()
  }
}

impl fmt::Display for PlotMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
  pub primary: Option<Column>,
  pub mode: PlotMode,
  pub nbins: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlotFigure {
  Empty,
  Histogram {
    column: Column,
    histogram: Histogram,
    boxplot: BoxSummary,
  },
  Scatter {
    x_column: Column,
    y_column: Column,
    points: Vec<(f64, f64)>,
    /// Degree-2 least-squares fit; empty when x has no spread.
    trend: Vec<(f64, f64)>,
  },
}

pub const STATS_HEADER: [&str; 8] = ["data", "mean", "std", "min", "25%", "50%", "75%", "max"];

#[derive(Debug, Clone, PartialEq)]
pub struct StatsRow {
  pub data: Column,
  pub summary: Summary,
}

impl StatsRow {
  /// Cells in `STATS_HEADER` order, numbers with 4 decimals.
  pub fn cells(&self) -> Vec<String> {
    let s = &self.summary;
    let mut cells = vec![self.data.name().to_string()];
    cells.extend(
      [s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max]
        .iter()
        .map(|v| if v.is_nan() { String::new() } else { format!("{:.4}", v) }),
    );
    cells
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
  pub rows: Vec<StatsRow>,
}

impl StatsTable {
  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }
}

/// Values of the plotted columns, keeping only rows where all of them are defined.
fn complete_rows(records: &RecordSet, columns: &[Column]) -> Vec<Vec<f64>> {
  let per_column: Vec<Vec<f64>> = columns
    .iter()
    .filter_map(|&c| records.column_values(c).ok())
    .collect();
  if per_column.len() != columns.len() {
    return vec![Vec::new(); columns.len()];
  }

  let mut kept = vec![Vec::new(); columns.len()];
  for row in 0..records.len() {
    if per_column.iter().all(|vals| !vals[row].is_nan()) {
      for (k, vals) in per_column.iter().enumerate() {
        kept[k].push(vals[row]);
      }
    }
  }
  kept
}

fn stats_table(columns: &[Column], data: &[Vec<f64>]) -> StatsTable {
  let mut rows = Vec::new();
  for (i, (&column, values)) in columns.iter().zip(data).enumerate() {
    // The same column on both axes gets a single row.
    if columns[..i].contains(&column) {
      continue;
    }
    if let Some(summary) = stats::describe(values) {
      rows.push(StatsRow { data: column, summary });
    }
  }
  StatsTable { rows }
}

fn trend_curve(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
  let Some(coeffs) = stats::polyfit(x, y, TREND_DEGREE) else {
    return Vec::new();
  };
  let xmin = x.iter().copied().fold(f64::INFINITY, f64::min);
  let xmax = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
  let pad = (xmax - xmin) * TREND_PADDING;

  stats::linspace(xmin - pad, xmax + pad, TREND_POINTS)
    .into_iter()
    .map(|xv| (xv, stats::polyval(&coeffs, xv)))
    .collect()
}

pub fn build_plot(records: Option<&RecordSet>, request: &PlotRequest) -> (PlotFigure, StatsTable) {
  let (Some(records), Some(primary)) = (records, request.primary) else {
    return (PlotFigure::Empty, StatsTable::default());
  };

  match request.mode {
    PlotMode::Histogram => {
      let data = complete_rows(records, &[primary]);
      let table = stats_table(&[primary], &data);
      let values = &data[0];

      let nbins = request.nbins.max(1);
      let figure = match (stats::histogram(values, nbins), stats::box_summary(values)) {
        (Some(histogram), Some(boxplot)) => PlotFigure::Histogram {
          column: primary,
          histogram,
          boxplot,
        },
        _ => PlotFigure::Empty,
      };
      (figure, table)
    }
    PlotMode::Against(secondary) => {
      let data = complete_rows(records, &[primary, secondary]);
      let table = stats_table(&[primary, secondary], &data);
      let (y, x) = (&data[0], &data[1]);

      if x.is_empty() {
        return (PlotFigure::Empty, table);
      }
      let figure = PlotFigure::Scatter {
        x_column: secondary,
        y_column: primary,
        points: x.iter().copied().zip(y.iter().copied()).collect(),
        trend: trend_curve(x, y),
      };
      (figure, table)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::AtomRecord;

  fn records() -> RecordSet {
    let pyr = [1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0];
    let curv = [0.5, f64::NAN, 1.5, 2.0, 2.5, 3.0];
    RecordSet::new(
      (0..pyr.len())
        .map(|i| {
          let mut r = AtomRecord::bare(i, "C", [0.0; 3]);
          r.pyr_a = pyr[i];
          r.spherical_curvature = curv[i];
          r
        })
        .collect(),
    )
  }

  #[test]
  fn histogram_drops_missing_and_has_exact_bins() {
    let set = records();
    for nbins in [5, 30, 50] {
      let req = PlotRequest {
        primary: Some(Column::PyrA),
        mode: PlotMode::Histogram,
        nbins,
      };
      let (figure, table) = build_plot(Some(&set), &req);
      match figure {
        PlotFigure::Histogram { histogram, .. } => assert_eq!(histogram.bins(), nbins),
        other => panic!("unexpected figure {:?}", other),
      }
      assert_eq!(table.rows.len(), 1);
      assert_eq!(table.rows[0].summary.count, 5);
    }
  }

  #[test]
  fn scatter_keeps_rows_defined_in_both_columns() {
    let set = records();
    let req = PlotRequest {
      primary: Some(Column::PyrA),
      mode: PlotMode::Against(Column::SphericalCurvature),
      nbins: 30,
    };
    let (figure, table) = build_plot(Some(&set), &req);
    match figure {
      PlotFigure::Scatter { points, trend, x_column, y_column } => {
        assert_eq!(x_column, Column::SphericalCurvature);
        assert_eq!(y_column, Column::PyrA);
        assert_eq!(points, vec![(0.5, 1.0), (2.0, 4.0), (2.5, 5.0), (3.0, 6.0)]);
        assert_eq!(trend.len(), TREND_POINTS);
        // x range 0.5..3.0 padded by 5 % of the span
        assert!((trend[0].0 - 0.375).abs() < 1e-12);
        assert!((trend[TREND_POINTS - 1].0 - 3.125).abs() < 1e-12);
      }
      other => panic!("unexpected figure {:?}", other),
    }
    let names: Vec<Column> = table.rows.iter().map(|r| r.data).collect();
    assert_eq!(names, vec![Column::PyrA, Column::SphericalCurvature]);
  }

  #[test]
  fn no_primary_gives_empty_outputs() {
    let set = records();
    let req = PlotRequest {
      primary: None,
      mode: PlotMode::Histogram,
      nbins: 30,
    };
    let (figure, table) = build_plot(Some(&set), &req);
    assert_eq!(figure, PlotFigure::Empty);
    assert!(table.is_empty());
  }

  #[test]
  fn stats_cells_use_four_decimals() {
    let set = records();
    let req = PlotRequest {
      primary: Some(Column::PyrA),
      mode: PlotMode::Histogram,
      nbins: 10,
    };
    let (_, table) = build_plot(Some(&set), &req);
    let cells = table.rows[0].cells();
    assert_eq!(cells.len(), STATS_HEADER.len());
    assert_eq!(cells[0], "pyrA");
    assert_eq!(cells[1], "3.6000");
    assert_eq!(cells[3], "1.0000");
    assert_eq!(cells[7], "6.0000");
  }

  #[test]
  fn all_missing_column_is_empty_figure() {
    let set = RecordSet::new(vec![AtomRecord::bare(0, "O", [0.0; 3])]);
    let req = PlotRequest {
      primary: Some(Column::PyrA),
      mode: PlotMode::Histogram,
      nbins: 30,
    };
    let (figure, table) = build_plot(Some(&set), &req);
    assert_eq!(figure, PlotFigure::Empty);
    assert!(table.is_empty());
  }

  #[test]
  fn mode_options() {
    let options = PlotMode::options();
    assert_eq!(options.len(), 14);
    assert_eq!(options[0].name(), "histogram");
    assert!(options.contains(&PlotMode::Against(Column::PyrA)));
    assert!(!options.contains(&PlotMode::Against(Column::Species)));
  }
}
