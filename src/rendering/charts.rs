// src/rendering/charts.rs

use crate::analysis::stats::{BoxSummary, Histogram};
use crate::analysis::Rgb;
use crate::dashboard::plots::PlotFigure;
use crate::dashboard::styling::ColorbarFigure;
use crate::model::Column;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;
use plotters::style::TextStyle;

type ChartResult = Result<(), Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
const TREND_COLOR: RGBColor = RGBColor(0xd6, 0x27, 0x28);

/// Range of `values` widened by `frac` of its span on each side; never empty.
pub fn padded_range(values: impl IntoIterator<Item = f64>, frac: f64) -> (f64, f64) {
  let (lo, hi) = values
    .into_iter()
    .filter(|v| v.is_finite())
    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
  if !lo.is_finite() {
    return (0.0, 1.0);
  }
  if lo == hi {
    return (lo - 0.5, hi + 0.5);
  }
  let pad = (hi - lo) * frac;
  (lo - pad, hi + pad)
}

fn rgb(c: Rgb) -> RGBColor {
  RGBColor(c.r, c.g, c.b)
}

fn draw_message<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, text: &str) -> ChartResult
where
  DB::ErrorType: 'static,
{
  let (w, h) = root.dim_in_pixel();
  let style = TextStyle::from((FONT, 16).into_font()).color(&RGBColor(128, 128, 128));
  root.draw_text(text, &style, (w as i32 / 2 - 80, h as i32 / 2))?;
  Ok(())
}

// --- Distribution plot ---

pub fn draw_plot<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &PlotFigure) -> ChartResult
where
  DB::ErrorType: 'static,
{
  root.fill(&WHITE)?;
  match figure {
    PlotFigure::Empty => draw_message(root, "Select a data column"),
    PlotFigure::Histogram {
      column,
      histogram,
      boxplot,
    } => draw_histogram(root, *column, histogram, boxplot),
    PlotFigure::Scatter {
      x_column,
      y_column,
      points,
      trend,
    } => draw_scatter(root, *x_column, *y_column, points, trend),
  }
}

fn draw_histogram<DB: DrawingBackend>(
  root: &DrawingArea<DB, Shift>,
  column: Column,
  histogram: &Histogram,
  boxplot: &BoxSummary,
) -> ChartResult
where
  DB::ErrorType: 'static,
{
  let x_lo = histogram.edges.first().copied().unwrap_or(0.0);
  let x_hi = histogram.edges.last().copied().unwrap_or(1.0);
  let p_max = histogram.probabilities.iter().copied().fold(0.0f64, f64::max);
  let y_hi = if p_max > 0.0 { p_max * 1.1 } else { 1.0 };

  // 1. Marginal box plot strip on top
  let (_, h) = root.dim_in_pixel();
  let (strip, main) = root.split_vertically((h as i32 / 5).max(40));

  let mut box_chart = ChartBuilder::on(&strip)
    .margin(10)
    .x_label_area_size(0)
    .y_label_area_size(60)
    .build_cartesian_2d(x_lo..x_hi, 0.0..1.0)?;
  box_chart
    .configure_mesh()
    .disable_mesh()
    .x_labels(0)
    .y_labels(0)
    .draw()?;

  let outline = BAR_COLOR.stroke_width(2);
  box_chart.draw_series(std::iter::once(Rectangle::new(
    [(boxplot.q1, 0.25), (boxplot.q3, 0.75)],
    BAR_COLOR.mix(0.3).filled(),
  )))?;
  box_chart.draw_series(std::iter::once(Rectangle::new(
    [(boxplot.q1, 0.25), (boxplot.q3, 0.75)],
    outline,
  )))?;
  box_chart.draw_series(
    [
      vec![(boxplot.median, 0.25), (boxplot.median, 0.75)],
      vec![(boxplot.whisker_low, 0.5), (boxplot.q1, 0.5)],
      vec![(boxplot.q3, 0.5), (boxplot.whisker_high, 0.5)],
    ]
    .into_iter()
    .map(|path| PathElement::new(path, outline)),
  )?;
  box_chart.draw_series(
    boxplot
      .outliers
      .iter()
      .map(|&v| Circle::new((v, 0.5), 3, BAR_COLOR.filled())),
  )?;

  // 2. Probability histogram
  let mut chart = ChartBuilder::on(&main)
    .margin(10)
    .x_label_area_size(45)
    .y_label_area_size(60)
    .build_cartesian_2d(x_lo..x_hi, 0.0..y_hi)?;
  chart
    .configure_mesh()
    .disable_x_mesh()
    .x_desc(column.name())
    .y_desc("probability")
    .axis_desc_style((FONT, 15))
    .draw()?;

  chart.draw_series(
    histogram
      .edges
      .windows(2)
      .zip(&histogram.probabilities)
      .map(|(e, &p)| Rectangle::new([(e[0], 0.0), (e[1], p)], BAR_COLOR.mix(0.8).filled())),
  )?;
  Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
  root: &DrawingArea<DB, Shift>,
  x_column: Column,
  y_column: Column,
  points: &[(f64, f64)],
  trend: &[(f64, f64)],
) -> ChartResult
where
  DB::ErrorType: 'static,
{
  let all = points.iter().chain(trend.iter());
  let (x_lo, x_hi) = padded_range(all.clone().map(|p| p.0), 0.02);
  let (y_lo, y_hi) = padded_range(all.map(|p| p.1), 0.05);

  let mut chart = ChartBuilder::on(root)
    .margin(15)
    .x_label_area_size(45)
    .y_label_area_size(60)
    .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
  chart
    .configure_mesh()
    .x_desc(x_column.name())
    .y_desc(y_column.name())
    .axis_desc_style((FONT, 15))
    .draw()?;

  chart.draw_series(
    points
      .iter()
      .map(|&p| Circle::new(p, 4, BAR_COLOR.mix(0.7).filled())),
  )?;
  if !trend.is_empty() {
    chart.draw_series(LineSeries::new(trend.iter().copied(), TREND_COLOR.stroke_width(2)))?;
  }
  Ok(())
}

// --- Colorbar ---

pub fn draw_colorbar<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &ColorbarFigure) -> ChartResult
where
  DB::ErrorType: 'static,
{
  root.fill(&WHITE)?;
  let ColorbarFigure::Gradient {
    title,
    min,
    max,
    samples,
  } = figure
  else {
    // Placeholder without axes
    return Ok(());
  };

  let (lo, hi) = if min < max {
    (*min, *max)
  } else {
    padded_range([*min, *max], 0.0)
  };

  let mut chart = ChartBuilder::on(root)
    .margin_left(20)
    .margin_right(20)
    .margin_top(8)
    .x_label_area_size(45)
    .y_label_area_size(0)
    .build_cartesian_2d(lo..hi, 0.0..1.0)?;
  chart
    .configure_mesh()
    .disable_mesh()
    .y_labels(0)
    .x_labels(6)
    .x_desc(title.as_str())
    .axis_desc_style((FONT, 14))
    .draw()?;

  if samples.len() == 1 || min >= max {
    let color = samples.first().map(|s| rgb(s.1)).unwrap_or(BLACK);
    chart.draw_series(std::iter::once(Rectangle::new([(lo, 0.0), (hi, 1.0)], color.filled())))?;
    return Ok(());
  }
  chart.draw_series(
    samples
      .windows(2)
      .map(|w| Rectangle::new([(w[0].0, 0.0), (w[1].0, 1.0)], rgb(w[0].1).filled())),
  )?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn padded_range_never_collapses() {
    assert_eq!(padded_range([2.0, 2.0], 0.05), (1.5, 2.5));
    assert_eq!(padded_range(Vec::<f64>::new(), 0.05), (0.0, 1.0));
    assert_eq!(padded_range([f64::NAN], 0.05), (0.0, 1.0));
    let (lo, hi) = padded_range([0.0, 10.0], 0.1);
    assert!((lo + 1.0).abs() < 1e-12 && (hi - 11.0).abs() < 1e-12);
  }
}
